//! # voxgen-speech
//!
//! Core speech and asset operations for voxgen:
//!
//! - **Speech synthesis** ([`SpeechSynthesizer`]): validates narration input
//!   and speaker configuration, issues a Gemini audio-modality request, and
//!   materializes the inline PCM payload as a WAV file with read-back
//!   metadata.
//! - **Asset metadata** ([`asset::get_asset_info`]): size/mime plus direct
//!   WAV parsing, falling back to an ffprobe subprocess for other formats.
//!   Probe failures degrade to a note on the result, never to an error.
//! - **Asset inspection** ([`AssetInspector`]): uploads an asset to the
//!   Gemini Files API, waits for it to become `ACTIVE` under a bounded
//!   polling budget, then issues a single analysis request.
//!
//! All public operations return typed errors; nothing here panics on a
//! recoverable condition.

pub mod asset;
pub mod error;
pub mod inspect;
pub mod output;
pub mod tts;
pub mod wav;

pub use asset::{
    AssetInfo, FfprobeProber, MediaProber, ProbeDocument, ProbeError, get_asset_info,
    get_asset_info_with,
};
pub use error::{AssetError, SpeechError, SpeechResult};
pub use inspect::{AssetInspector, ReadinessPoller, RemoteMediaStore};
pub use output::resolve_output_path;
pub use tts::{
    DEFAULT_TTS_MODEL, DEFAULT_VOICE, Speaker, SpeakerMode, SpeechOutput, SpeechParams,
    SpeechSynthesizer,
};
pub use wav::{WavInfo, WavParams, read_wav_info, write_wav};
