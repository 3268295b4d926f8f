use std::path::PathBuf;
use thiserror::Error;

/// Errors from the speech synthesis pipeline.
///
/// Validation variants are produced before any remote call; transport and
/// persistence failures are caught at the call site and re-wrapped with a
/// descriptive message.
#[derive(Error, Debug)]
pub enum SpeechError {
    /// Narration text was empty after trimming
    #[error("text is required")]
    EmptyText,

    /// Multi-speaker synthesis supports at most two speakers
    #[error("multi-speaker TTS supports a maximum of 2 speakers, got {0}")]
    TooManySpeakers(usize),

    /// The pro-tier models only support single-speaker synthesis
    #[error("multi-speaker is not supported on {0}; use a flash TTS model")]
    UnsupportedModelForMultiSpeaker(String),

    /// Every speaker needs a name matching a label used in the text
    #[error("each speaker must have a name matching labels in the text")]
    MissingSpeakerName,

    /// The remote synthesis call failed (transport or service error)
    #[error("TTS request failed: {0}")]
    RequestFailed(String),

    /// The response carried no decodable inline audio
    #[error("TTS response did not include audio data")]
    NoAudioInResponse,

    /// Writing or re-reading the output WAV failed
    #[error("failed to save audio: {0}")]
    PersistFailed(String),
}

/// Result type for speech operations
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors from asset inspection.
///
/// Best-effort metadata degradation (missing ffprobe, probe failure) is NOT
/// represented here; it surfaces as a note on [`crate::AssetInfo`].
#[derive(Error, Debug)]
pub enum AssetError {
    /// The path does not exist or is not a regular file
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Uploading the asset to the remote service failed
    #[error("upload failed: {0}")]
    UploadFailed(String),

    /// The polling budget was exhausted before the file became ready.
    /// Retryable by the caller; the upload itself succeeded.
    #[error("file is still processing; try again in a few seconds")]
    StillProcessing,

    /// The analysis request failed after the file was ready
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),
}
