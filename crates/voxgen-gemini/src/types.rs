//! Wire types for the Gemini REST API.
//!
//! Field names follow the service's camelCase JSON; only the fields voxgen
//! reads or writes are modeled. Unknown fields are ignored on
//! deserialization.

use serde::{Deserialize, Serialize};

/// Request body for `models/<model>:generateContent`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A single content entry (one turn) in a request or response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Single-text-part content, the shape used for plain prompts
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Content pairing an uploaded file with an instruction prompt
    pub fn from_file_and_text(file: &RemoteFile, text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::file(file), Part::text(text)],
        }
    }
}

/// One part of a content entry: text, inline bytes, or a file reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn file(file: &RemoteFile) -> Self {
        Self {
            file_data: Some(FileData {
                file_uri: file.uri.clone().unwrap_or_default(),
                mime_type: file.mime_type.clone(),
            }),
            ..Self::default()
        }
    }
}

/// Inline binary payload; `data` is base64 text on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub data: String,
}

/// Reference to a previously uploaded file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Generation controls; voxgen only uses modalities and speech config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

impl GenerationConfig {
    /// Config requesting audio output with the given speech configuration
    pub fn audio(speech_config: SpeechConfig) -> Self {
        Self {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: Some(speech_config),
        }
    }
}

/// Speech synthesis configuration: exactly one of the two variants is set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_config: Option<VoiceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_speaker_voice_config: Option<MultiSpeakerVoiceConfig>,
}

impl SpeechConfig {
    /// Single-speaker configuration with a prebuilt voice
    pub fn single(voice_name: impl Into<String>) -> Self {
        Self {
            voice_config: Some(VoiceConfig::prebuilt(voice_name)),
            multi_speaker_voice_config: None,
        }
    }

    /// Multi-speaker configuration from (speaker label, voice name) pairs
    pub fn multi(speakers: impl IntoIterator<Item = (String, String)>) -> Self {
        let speaker_voice_configs = speakers
            .into_iter()
            .map(|(speaker, voice)| SpeakerVoiceConfig {
                speaker,
                voice_config: VoiceConfig::prebuilt(voice),
            })
            .collect();
        Self {
            voice_config: None,
            multi_speaker_voice_config: Some(MultiSpeakerVoiceConfig {
                speaker_voice_configs,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

impl VoiceConfig {
    pub fn prebuilt(voice_name: impl Into<String>) -> Self {
        Self {
            prebuilt_voice_config: PrebuiltVoiceConfig {
                voice_name: voice_name.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSpeakerVoiceConfig {
    pub speaker_voice_configs: Vec<SpeakerVoiceConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerVoiceConfig {
    pub speaker: String,
    pub voice_config: VoiceConfig,
}

/// Response body of `generateContent`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// First part of the first candidate, where inline audio is delivered
    pub fn first_part(&self) -> Option<&Part> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
    }

    /// Inline payload of the first part, if any
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.first_part()?.inline_data.as_ref()
    }

    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let joined: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if joined.is_empty() { None } else { Some(joined) }
    }
}

/// Remote file handle returned by the Files API.
///
/// The handle is never mutated locally; a fresh one is fetched to observe
/// state changes (`PROCESSING` -> `ACTIVE` / `FAILED`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl RemoteFile {
    /// State marker meaning the file is ready for analysis requests
    pub const ACTIVE: &'static str = "ACTIVE";

    pub fn is_active(&self) -> bool {
        self.state.as_deref() == Some(Self::ACTIVE)
    }
}

/// Upload responses wrap the file object in a `file` field
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FileEnvelope {
    pub file: RemoteFile,
}

/// Error envelope the service returns on non-2xx statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}
