//! Speech request construction and response materialization.
//!
//! The pipeline validates narration input and speaker configuration,
//! constructs a single- or multi-speaker synthesis request, issues one
//! Gemini call with audio response modality, and persists the returned PCM
//! as a WAV file whose metadata is re-read to populate the result. A single
//! failed remote call is a single reported failure; there is no retry.

use std::path::PathBuf;

use base64::Engine;
use serde::{Deserialize, Serialize};
use voxgen_gemini::{
    Content, GeminiClient, GenerateContentRequest, GenerationConfig, SpeechConfig,
};

use crate::error::{SpeechError, SpeechResult};
use crate::output::resolve_output_path;
use crate::wav::{self, WavParams, read_wav_info, write_wav};

/// Default prebuilt voice for single-speaker synthesis and per-speaker
/// fallback in multi-speaker mode
pub const DEFAULT_VOICE: &str = "Kore";

/// Default synthesis model; supports both speaker modes
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Multi-speaker synthesis is capped at two speakers by the service
const MAX_SPEAKERS: usize = 2;

/// Marker in model names for the quality tier without multi-speaker support
const PRO_TIER_MARKER: &str = "pro";

/// Fixed instruction separating the style directive from the literal text,
/// so style influences delivery without altering wording
const READ_EXACTLY: &str = "Read this text exactly:";

/// A speaker in multi-speaker dialogue; the name must match a label used in
/// the narration text (caller contract, not validated syntactically here).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    /// Falls back to [`DEFAULT_VOICE`] when absent
    #[serde(default)]
    pub voice_name: Option<String>,
}

/// Parameters for speech generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechParams {
    /// Narration text; for multi-speaker, formatted as "Name: dialogue" lines
    pub text: String,

    /// Explicit output file, absolute or relative to the working directory
    #[serde(default)]
    pub output_path: Option<String>,

    /// Base directory for auto-generated names; ignored when `output_path`
    /// is given
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Prebuilt voice for single-speaker mode
    #[serde(default = "default_voice")]
    pub voice_name: String,

    /// Natural-language delivery instructions prepended to the text
    #[serde(default)]
    pub style_prompt: String,

    /// Synthesis model
    #[serde(default = "default_model")]
    pub model: String,

    /// Two entries select multi-speaker mode; fewer mean single-speaker
    #[serde(default)]
    pub speakers: Vec<Speaker>,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_model() -> String {
    DEFAULT_TTS_MODEL.to_string()
}

impl SpeechParams {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            output_path: None,
            output_dir: None,
            voice_name: default_voice(),
            style_prompt: String::new(),
            model: default_model(),
            speakers: Vec::new(),
        }
    }
}

/// Speaker mode selected from the input shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerMode {
    Single { voice_name: String },
    Multi { speakers: Vec<(String, String)> },
}

impl SpeakerMode {
    /// Validates the speaker configuration against the model and selects a
    /// mode. Multi-speaker is chosen when two or more speakers are supplied.
    pub fn select(params: &SpeechParams) -> SpeechResult<Self> {
        if params.speakers.len() < MAX_SPEAKERS {
            return Ok(Self::Single {
                voice_name: params.voice_name.clone(),
            });
        }
        if params.speakers.len() > MAX_SPEAKERS {
            return Err(SpeechError::TooManySpeakers(params.speakers.len()));
        }
        if params.model.to_lowercase().contains(PRO_TIER_MARKER) {
            return Err(SpeechError::UnsupportedModelForMultiSpeaker(
                params.model.clone(),
            ));
        }

        let mut speakers = Vec::with_capacity(params.speakers.len());
        for speaker in &params.speakers {
            let name = speaker.name.trim();
            if name.is_empty() {
                return Err(SpeechError::MissingSpeakerName);
            }
            let voice = speaker
                .voice_name
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_VOICE);
            speakers.push((name.to_string(), voice.to_string()));
        }
        Ok(Self::Multi { speakers })
    }

    fn to_speech_config(&self) -> SpeechConfig {
        match self {
            Self::Single { voice_name } => SpeechConfig::single(voice_name.clone()),
            Self::Multi { speakers } => SpeechConfig::multi(speakers.iter().cloned()),
        }
    }
}

/// Composes the prompt sent to the service: the trimmed text, optionally
/// prefixed with the trimmed style directive and the fixed instruction.
pub(crate) fn compose_prompt(text: &str, style_prompt: &str) -> String {
    let style = style_prompt.trim();
    if style.is_empty() {
        text.to_string()
    } else {
        format!("{style}\n\n{READ_EXACTLY}\n{text}")
    }
}

/// Decodes the inline audio payload: base64 text on the wire, with a raw
/// byte passthrough for payloads that are not valid base64.
fn decode_audio_payload(data: &str) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .unwrap_or_else(|_| data.as_bytes().to_vec())
}

/// Result of a successful speech generation
#[derive(Debug, Clone, Serialize)]
pub struct SpeechOutput {
    pub path: PathBuf,
    pub voice_name: String,
    pub model: String,
    /// Rounded to millisecond precision
    pub duration_seconds: f64,
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub size_bytes: u64,
    pub text_characters: usize,
}

/// Speech generation pipeline over a Gemini client
pub struct SpeechSynthesizer {
    client: GeminiClient,
}

impl SpeechSynthesizer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Generates speech audio and saves it as a 24 kHz 16-bit mono WAV.
    ///
    /// Validation short-circuits before any remote call; every failure mode
    /// is a typed [`SpeechError`].
    pub async fn generate(&self, params: &SpeechParams) -> SpeechResult<SpeechOutput> {
        let text = params.text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let mode = SpeakerMode::select(params)?;
        let prompt = compose_prompt(text, &params.style_prompt);

        let request = GenerateContentRequest {
            contents: vec![Content::from_text(prompt)],
            generation_config: Some(GenerationConfig::audio(mode.to_speech_config())),
        };

        log::info!(
            "generating speech: model={}, mode={}, {} chars",
            params.model,
            match mode {
                SpeakerMode::Single { .. } => "single",
                SpeakerMode::Multi { .. } => "multi",
            },
            text.chars().count()
        );

        let response = self
            .client
            .generate_content(&params.model, &request)
            .await
            .map_err(|err| SpeechError::RequestFailed(err.to_string()))?;

        let inline = response
            .inline_data()
            .ok_or(SpeechError::NoAudioInResponse)?;
        let pcm = decode_audio_payload(&inline.data);
        if pcm.is_empty() {
            return Err(SpeechError::NoAudioInResponse);
        }

        let target = resolve_output_path(params.output_path.as_deref(), params.output_dir.as_deref());

        write_wav(&target, &pcm, &WavParams::default())
            .map_err(|err| SpeechError::PersistFailed(err.to_string()))?;

        // Read-back is the integrity check: duration comes from the file,
        // not from the request parameters.
        let info =
            read_wav_info(&target).map_err(|err| SpeechError::PersistFailed(err.to_string()))?;
        let size_bytes = std::fs::metadata(&target)
            .map_err(|err| SpeechError::PersistFailed(err.to_string()))?
            .len();

        log::info!(
            "saved {} ({size_bytes} bytes, {:.3}s)",
            target.display(),
            info.duration_seconds()
        );

        Ok(SpeechOutput {
            path: target,
            voice_name: params.voice_name.clone(),
            model: params.model.clone(),
            duration_seconds: wav::round_millis(info.duration_seconds()),
            sample_rate_hz: info.sample_rate_hz,
            channels: info.channels,
            size_bytes,
            text_characters: params.text.chars().count(),
        })
    }
}
