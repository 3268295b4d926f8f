//! HTTP client for the Gemini generateContent and Files endpoints.

use std::env;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{GeminiError, GeminiResult};
use crate::types::{
    ApiErrorEnvelope, FileEnvelope, GenerateContentRequest, GenerateContentResponse, RemoteFile,
};

/// Production endpoint; tests point the client at a mock server instead
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

static ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
static ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Client for the Gemini REST API
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> GeminiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Creates a client from `GEMINI_API_KEY` or `GOOGLE_API_KEY`.
    pub fn from_env() -> GeminiResult<Self> {
        let key = env::var(ENV_GEMINI_API_KEY)
            .or_else(|_| env::var(ENV_GOOGLE_API_KEY))
            .map_err(|_| GeminiError::MissingApiKey)?;
        Self::new(key)
    }

    /// Overrides the base URL (mock servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a `generateContent` request for the given model.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        log::debug!("generateContent: model={model}");
        let response = self.http.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    /// Uploads a local file through the Files API raw upload protocol.
    ///
    /// The returned handle starts in `PROCESSING` for audio/video payloads;
    /// callers poll [`GeminiClient::get_file`] until it becomes `ACTIVE`.
    pub async fn upload_file(&self, path: &Path, mime_type: &str) -> GeminiResult<RemoteFile> {
        let bytes = tokio::fs::read(path).await?;
        let url = format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key);
        log::debug!(
            "uploading {} ({} bytes, {mime_type})",
            path.display(),
            bytes.len()
        );
        let response = self
            .http
            .post(&url)
            .header("X-Goog-Upload-Protocol", "raw")
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;
        let envelope: FileEnvelope = Self::decode(response).await?;
        Ok(envelope.file)
    }

    /// Fetches the current state of an uploaded file by its resource name
    /// (e.g. `files/abc123`).
    pub async fn get_file(&self, name: &str) -> GeminiResult<RemoteFile> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.base_url,
            name.trim_start_matches('/'),
            self.api_key
        );
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    /// Decodes a response body, mapping non-2xx statuses to [`GeminiError::Api`]
    /// with the message from the service's error envelope when present.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> GeminiResult<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.clone());
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&body)
            .map_err(|err| GeminiError::ResponseFormat(format!("{err}; body: {body}")))
    }
}
