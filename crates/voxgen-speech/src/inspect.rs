//! Remote multimodal asset inspection and the readiness state machine.
//!
//! An asset is uploaded to the Files API and enters `PROCESSING`; the
//! [`ReadinessPoller`] re-fetches its state once per interval until it is
//! `ACTIVE` or the attempt budget runs out. A transient fetch error carries
//! no new information and does not abort the loop. Only once the file is
//! ready is the single analysis request issued.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use voxgen_gemini::{
    Content, GeminiClient, GeminiError, GenerateContentRequest, RemoteFile,
};

use crate::asset::{absolutize, mime_for_path};
use crate::error::AssetError;

/// Default analysis model when neither the caller nor `GEMINI_MODEL` says
/// otherwise
pub const DEFAULT_INSPECT_MODEL: &str = "gemini-2.0-flash";

/// Polling budget: attempts and the fixed interval between them.
/// These bound the worst-case blocking wait at 60 seconds.
pub const POLL_MAX_ATTEMPTS: u32 = 60;
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

const ENV_INSPECT_MODEL: &str = "GEMINI_MODEL";

const DEFAULT_INSPECT_PROMPT: &str = "Analyze this media file for voiceover/audio production purposes:\n\
1. Describe the overall content and mood.\n\
2. Note tone, pacing, and clarity of any speech.\n\
3. Identify any background noise, artifacts, or quality issues.\n\
4. Suggest any improvements if applicable.";

const NO_RESPONSE_TEXT: &str = "(No response text)";

/// Remote side of asset inspection: upload, state fetch, analysis.
#[async_trait]
pub trait RemoteMediaStore: Send + Sync {
    async fn upload(&self, path: &Path, mime_type: &str) -> Result<RemoteFile, GeminiError>;

    async fn fetch(&self, name: &str) -> Result<RemoteFile, GeminiError>;

    async fn analyze(
        &self,
        file: &RemoteFile,
        prompt: &str,
        model: &str,
    ) -> Result<String, GeminiError>;
}

#[async_trait]
impl RemoteMediaStore for GeminiClient {
    async fn upload(&self, path: &Path, mime_type: &str) -> Result<RemoteFile, GeminiError> {
        self.upload_file(path, mime_type).await
    }

    async fn fetch(&self, name: &str) -> Result<RemoteFile, GeminiError> {
        self.get_file(name).await
    }

    async fn analyze(
        &self,
        file: &RemoteFile,
        prompt: &str,
        model: &str,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::from_file_and_text(file, prompt)],
            generation_config: None,
        };
        let response = self.generate_content(model, &request).await?;
        Ok(response
            .text()
            .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string()))
    }
}

/// Bounded polling loop waiting for an uploaded file to become `ACTIVE`.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessPoller {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self {
            max_attempts: POLL_MAX_ATTEMPTS,
            interval: POLL_INTERVAL,
        }
    }
}

impl ReadinessPoller {
    /// Re-fetches the file state once per interval until it is `ACTIVE`.
    ///
    /// Each attempt is fetch, check, sleep; a fetch error keeps the previous
    /// handle and the loop running. Exhausting the budget without reaching
    /// `ACTIVE` is [`AssetError::StillProcessing`].
    pub async fn wait_until_active<S: RemoteMediaStore + ?Sized>(
        &self,
        store: &S,
        mut file: RemoteFile,
    ) -> Result<RemoteFile, AssetError> {
        for attempt in 1..=self.max_attempts {
            match store.fetch(&file.name).await {
                Ok(latest) => file = latest,
                Err(err) => {
                    log::debug!("poll attempt {attempt}/{}: {err}", self.max_attempts);
                }
            }
            if file.is_active() {
                log::debug!("{} active after {attempt} attempt(s)", file.name);
                return Ok(file);
            }
            tokio::time::sleep(self.interval).await;
        }
        Err(AssetError::StillProcessing)
    }
}

/// Upload-poll-analyze pipeline over a remote media store.
pub struct AssetInspector<S: RemoteMediaStore> {
    store: S,
    poller: ReadinessPoller,
}

impl<S: RemoteMediaStore> AssetInspector<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            poller: ReadinessPoller::default(),
        }
    }

    pub fn with_poller(store: S, poller: ReadinessPoller) -> Self {
        Self { store, poller }
    }

    /// Uploads the asset, waits for readiness, and returns the analysis
    /// text. `prompt` defaults to a voiceover-audit breakdown; `model`
    /// defaults to the `GEMINI_MODEL` env var or [`DEFAULT_INSPECT_MODEL`].
    pub async fn inspect(
        &self,
        path: &Path,
        prompt: Option<&str>,
        model: Option<&str>,
    ) -> Result<String, AssetError> {
        let target = absolutize(path);
        if !target.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }

        // Trimming is only for the emptiness test; the prompt itself is
        // forwarded untouched.
        let prompt = match prompt {
            Some(p) if !p.trim().is_empty() => p.to_string(),
            _ => DEFAULT_INSPECT_PROMPT.to_string(),
        };
        let model = model
            .map(str::to_string)
            .or_else(|| std::env::var(ENV_INSPECT_MODEL).ok())
            .unwrap_or_else(|| DEFAULT_INSPECT_MODEL.to_string());

        let mime_type = mime_for_path(&target);
        log::info!("uploading {} for inspection ({mime_type})", target.display());
        let uploaded = self
            .store
            .upload(&target, &mime_type)
            .await
            .map_err(|err| AssetError::UploadFailed(err.to_string()))?;

        let active = self.poller.wait_until_active(&self.store, uploaded).await?;

        self.store
            .analyze(&active, &prompt, &model)
            .await
            .map_err(|err| AssetError::AnalysisFailed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that replays a scripted sequence of fetch outcomes
    struct ScriptedStore {
        states: Mutex<Vec<Result<Option<&'static str>, ()>>>,
        fetches: AtomicUsize,
        analyses: AtomicUsize,
    }

    impl ScriptedStore {
        /// `Ok(Some(state))` fetches that state, `Err(())` simulates a
        /// transient fetch error; the last entry repeats forever.
        fn new(states: Vec<Result<Option<&'static str>, ()>>) -> Self {
            Self {
                states: Mutex::new(states),
                fetches: AtomicUsize::new(0),
                analyses: AtomicUsize::new(0),
            }
        }

        fn processing() -> RemoteFile {
            RemoteFile {
                name: "files/test".to_string(),
                uri: Some("https://example.com/files/test".to_string()),
                mime_type: Some("video/mp4".to_string()),
                state: Some("PROCESSING".to_string()),
            }
        }
    }

    #[async_trait]
    impl RemoteMediaStore for ScriptedStore {
        async fn upload(&self, _path: &Path, _mime: &str) -> Result<RemoteFile, GeminiError> {
            Ok(Self::processing())
        }

        async fn fetch(&self, name: &str) -> Result<RemoteFile, GeminiError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let mut states = self.states.lock().unwrap();
            let next = if states.len() > 1 {
                states.remove(0)
            } else {
                states[0]
            };
            match next {
                Ok(state) => Ok(RemoteFile {
                    name: name.to_string(),
                    uri: Some("https://example.com/files/test".to_string()),
                    mime_type: Some("video/mp4".to_string()),
                    state: state.map(str::to_string),
                }),
                Err(()) => Err(GeminiError::ResponseFormat("transient".to_string())),
            }
        }

        async fn analyze(
            &self,
            file: &RemoteFile,
            prompt: &str,
            model: &str,
        ) -> Result<String, GeminiError> {
            self.analyses.fetch_add(1, Ordering::SeqCst);
            Ok(format!("analysis of {} with {model}: {prompt}", file.name))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_exits_the_instant_state_is_active() {
        let store = ScriptedStore::new(vec![
            Ok(Some("PROCESSING")),
            Ok(Some("PROCESSING")),
            Ok(Some("ACTIVE")),
        ]);
        let poller = ReadinessPoller::default();

        let file = poller
            .wait_until_active(&store, ScriptedStore::processing())
            .await
            .unwrap();

        assert!(file.is_active());
        assert_eq!(store.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_times_out_after_budget() {
        let store = ScriptedStore::new(vec![Ok(Some("PROCESSING"))]);
        let poller = ReadinessPoller::default();

        let err = poller
            .wait_until_active(&store, ScriptedStore::processing())
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::StillProcessing));
        assert_eq!(store.fetches.load(Ordering::SeqCst), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_fetch_errors_do_not_abort_polling() {
        let store = ScriptedStore::new(vec![Err(()), Err(()), Ok(Some("ACTIVE"))]);
        let poller = ReadinessPoller::default();

        let file = poller
            .wait_until_active(&store, ScriptedStore::processing())
            .await
            .unwrap();

        assert!(file.is_active());
        assert_eq!(store.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_state_keeps_polling_until_budget() {
        // FAILED is not the ready marker; the loop only exits early on ACTIVE
        let store = ScriptedStore::new(vec![Ok(Some("FAILED"))]);
        let poller = ReadinessPoller {
            max_attempts: 5,
            interval: POLL_INTERVAL,
        };

        let err = poller
            .wait_until_active(&store, ScriptedStore::processing())
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::StillProcessing));
        assert_eq!(store.fetches.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inspect_full_pipeline_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"payload").unwrap();

        let store = ScriptedStore::new(vec![Ok(Some("PROCESSING")), Ok(Some("ACTIVE"))]);
        let inspector = AssetInspector::new(store);

        let analysis = inspector.inspect(&path, None, None).await.unwrap();

        assert!(analysis.contains("files/test"));
        assert!(analysis.contains("voiceover/audio production"));
        assert_eq!(inspector.store.analyses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inspect_forwards_caller_prompt_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"payload").unwrap();

        let store = ScriptedStore::new(vec![Ok(Some("ACTIVE"))]);
        let inspector = AssetInspector::new(store);

        let analysis = inspector
            .inspect(&path, Some("  check pacing  "), Some("gemini-2.0-flash"))
            .await
            .unwrap();

        // Surrounding whitespace is the caller's to keep
        assert!(analysis.ends_with("  check pacing  "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_inspect_whitespace_prompt_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"payload").unwrap();

        let store = ScriptedStore::new(vec![Ok(Some("ACTIVE"))]);
        let inspector = AssetInspector::new(store);

        let analysis = inspector.inspect(&path, Some("   "), None).await.unwrap();
        assert!(analysis.contains("voiceover/audio production"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_inspect_timeout_issues_no_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"payload").unwrap();

        let store = ScriptedStore::new(vec![Ok(Some("PROCESSING"))]);
        let inspector = AssetInspector::new(store);

        let err = inspector
            .inspect(&path, Some("check pacing"), Some("gemini-2.0-flash"))
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::StillProcessing));
        assert_eq!(inspector.store.analyses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_inspect_missing_path() {
        let store = ScriptedStore::new(vec![Ok(Some("ACTIVE"))]);
        let inspector = AssetInspector::new(store);

        let err = inspector
            .inspect(Path::new("/no/such/clip.mp4"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
        assert_eq!(inspector.store.fetches.load(Ordering::SeqCst), 0);
    }
}
