use thiserror::Error;

/// Errors surfaced by the Gemini client
#[derive(Error, Debug)]
pub enum GeminiError {
    /// No API key was provided or found in the environment
    #[error("Missing Gemini API key: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingApiKey,

    /// Transport-level failure (connection, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Unexpected Gemini response: {0}")]
    ResponseFormat(String),

    /// Local IO failure while reading a file for upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Gemini client operations
pub type GeminiResult<T> = Result<T, GeminiError>;
