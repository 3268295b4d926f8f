//! Best-effort media asset metadata extraction.
//!
//! Size and mime type are always populated. WAV files are parsed directly
//! (never spawning a subprocess); everything else goes through a
//! [`MediaProber`], in production an `ffprobe` invocation with a bounded
//! timeout. A missing or failing prober degrades to a note on the result
//! rather than an error: partial metadata is the normal case.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AssetError;
use crate::wav::read_wav_info;

/// Timeout for a single probe invocation
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const NOTE_PROBER_MISSING: &str = "Install ffprobe for duration and codec info.";
const NOTE_PROBE_FAILED: &str = "ffprobe failed; only basic file info available.";

/// Metadata for a media asset. Optional fields absent means extraction was
/// unavailable for them, not that anything failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Best-effort, derived from the filename extension
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_width_bytes: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Set when probing was unavailable; the rest of the record is valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Parsed probe output (the ffprobe JSON document subset voxgen reads)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeDocument {
    #[serde(default)]
    pub format: Option<ProbeFormat>,
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    /// ffprobe reports duration as a decimal string
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Why a probe produced no metadata; both map to a note, not an error
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe binary not found")]
    BinaryMissing,
    #[error("probe failed: {0}")]
    Failed(String),
}

/// Seam for the external probing subprocess
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeDocument, ProbeError>;
}

/// `ffprobe` subprocess prober
pub struct FfprobeProber {
    program: String,
    timeout: Duration,
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self {
            program: "ffprobe".to_string(),
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl FfprobeProber {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> Result<ProbeDocument, ProbeError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration:stream=width,height,codec_name,codec_type",
                "-of",
                "json",
            ])
            .arg(path)
            // A probe abandoned by the timeout must not keep running
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ProbeError::Failed(format!("{} timed out", self.program)))?
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    ProbeError::BinaryMissing
                } else {
                    ProbeError::Failed(err.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Failed(stderr.trim().to_string()));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|err| ProbeError::Failed(format!("unparseable probe output: {err}")))
    }
}

/// Resolves a path against the working directory when relative.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

/// Best-effort mime type from the filename extension.
pub(crate) fn mime_for_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    };
    mime.to_string()
}

fn apply_probe(info: &mut AssetInfo, doc: &ProbeDocument) {
    if let Some(duration) = doc
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
    {
        info.duration_seconds = Some(crate::wav::round_millis(duration));
    }

    let video = doc
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let audio = doc
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    if let Some(video) = video {
        info.width = video.width;
        info.height = video.height;
        info.video_codec = video.codec_name.clone();
    }
    if let Some(audio) = audio {
        info.audio_codec = audio.codec_name.clone();
    }
}

/// Extracts metadata for a media file using the default ffprobe prober.
pub async fn get_asset_info(path: &Path) -> Result<AssetInfo, AssetError> {
    get_asset_info_with(path, &FfprobeProber::default()).await
}

/// Extracts metadata with a caller-supplied prober.
///
/// WAV files short-circuit to direct container parsing and never touch the
/// prober. Probe unavailability is reported through `AssetInfo::note`.
pub async fn get_asset_info_with(
    path: &Path,
    prober: &dyn MediaProber,
) -> Result<AssetInfo, AssetError> {
    let target = absolutize(path);
    if !target.is_file() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    let size_bytes = std::fs::metadata(&target)
        .map_err(|_| AssetError::NotFound(path.to_path_buf()))?
        .len();

    let mut info = AssetInfo {
        mime_type: mime_for_path(&target),
        size_bytes,
        path: target.clone(),
        ..AssetInfo::default()
    };

    let is_wav = target
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);
    if is_wav {
        match read_wav_info(&target) {
            Ok(wav) => {
                info.duration_seconds = Some(crate::wav::round_millis(wav.duration_seconds()));
                info.sample_rate_hz = Some(wav.sample_rate_hz);
                info.channels = Some(wav.channels);
                info.sample_width_bytes = Some(wav.bits_per_sample / 8);
                return Ok(info);
            }
            // Malformed WAV: fall through to the probe path
            Err(err) => log::debug!("direct WAV parse failed for {}: {err}", target.display()),
        }
    }

    match prober.probe(&target).await {
        Ok(doc) => apply_probe(&mut info, &doc),
        Err(ProbeError::BinaryMissing) => info.note = Some(NOTE_PROBER_MISSING.to_string()),
        Err(ProbeError::Failed(reason)) => {
            log::debug!("probe failed for {}: {reason}", target.display());
            info.note = Some(NOTE_PROBE_FAILED.to_string());
        }
    }

    Ok(info)
}
