//! # voxgen-gemini
//!
//! Thin typed client for the Gemini REST API, covering the two surfaces
//! voxgen needs:
//!
//! - `models/<model>:generateContent` — text prompts with an optional
//!   speech configuration and response modalities (used for both speech
//!   synthesis and multimodal analysis),
//! - the Files API (`upload/v1beta/files`, `v1beta/files/<id>`) — upload a
//!   media asset and re-fetch its processing state.
//!
//! The client is strictly request-in/response-out: no retries, no caching.
//! Every fallible call returns a [`GeminiError`], and non-2xx responses are
//! mapped to [`GeminiError::Api`] with the service's error message.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_BASE_URL, GeminiClient};
pub use error::{GeminiError, GeminiResult};
pub use types::{
    Candidate, Content, FileData, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, Part, PrebuiltVoiceConfig, RemoteFile, SpeechConfig,
    VoiceConfig,
};
