// Orchestrator with fallback logic

use std::fmt;

use super::errors::DownloadError;
use super::extractors::{diagnose_error, BlockingReason, CliExtractor, ExtractorMode, PythonExtractor};
use super::models::DownloadRequest;
use super::traits::{Extractor, ProgressReporter};

pub struct Downloader {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Build the extractor chain for a mode; Auto tries CLI then Python
    pub fn for_mode(mode: ExtractorMode, ytdlp_path: Option<String>, python: String) -> Self {
        let mut downloader = Self::new();
        match mode {
            ExtractorMode::Cli => downloader.add_extractor(Box::new(CliExtractor::new(ytdlp_path))),
            ExtractorMode::Python => downloader.add_extractor(Box::new(PythonExtractor::new(python))),
            ExtractorMode::Auto => {
                downloader.add_extractor(Box::new(CliExtractor::new(ytdlp_path)));
                downloader.add_extractor(Box::new(PythonExtractor::new(python)));
            }
        }
        downloader
    }

    pub fn add_extractor(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Run extractors in order until one succeeds
    pub async fn download(&self, request: &DownloadRequest) -> Result<&'static str, DownloadFailure> {
        let progress = ProgressReporter::new();
        let mut last: Option<(DownloadError, &'static str)> = None;
        let mut attempted = 0;

        for extractor in &self.extractors {
            if !extractor.is_available().await {
                tracing::debug!(extractor = extractor.name(), "not available, skipping");
                continue;
            }
            attempted += 1;
            tracing::debug!(extractor = extractor.name(), "trying extractor");

            match extractor.download(request, &progress).await {
                Ok(()) => {
                    tracing::info!(extractor = extractor.name(), "download finished");
                    return Ok(extractor.name());
                }
                Err(e) => {
                    tracing::warn!(extractor = extractor.name(), error = %e, "extractor failed");
                    let permanent = diagnose_error(&e.to_string())
                        .map(|r| r.is_permanent())
                        .unwrap_or(false);
                    last = Some((e, extractor.name()));
                    if permanent {
                        break;
                    }
                }
            }
        }

        match last {
            Some((error, used)) => {
                let blocking_reason = diagnose_error(&error.to_string());
                Err(DownloadFailure {
                    error,
                    blocking_reason,
                    used: Some(used),
                    tried_fallback: attempted > 1,
                })
            }
            None => Err(DownloadFailure {
                error: DownloadError::ToolNotFound(format!(
                    "no usable extractor among: {}",
                    self.extractor_names().join(", ")
                )),
                blocking_reason: None,
                used: None,
                tried_fallback: false,
            }),
        }
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure with diagnostic information
#[derive(Debug, Clone)]
pub struct DownloadFailure {
    pub error: DownloadError,
    pub blocking_reason: Option<BlockingReason>,
    /// Extractor that produced `error`
    pub used: Option<&'static str>,
    pub tried_fallback: bool,
}

impl DownloadFailure {
    pub fn suggestion(&self) -> Option<String> {
        match (&self.error, self.blocking_reason) {
            (DownloadError::ToolNotFound(_), _) => Some(
                "Install yt-dlp: pip install yt-dlp (or brew install yt-dlp), \
                 or point --ytdlp / YTDLP_PYTHON at an existing install"
                    .to_string(),
            ),
            (_, Some(reason)) => Some(reason.suggestion()),
            (_, None) => None,
        }
    }
}

impl fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(used) = self.used {
            write!(f, " (via {}", used)?;
            if self.tried_fallback {
                write!(f, ", after fallback")?;
            }
            write!(f, ")")?;
        }

        if let Some(reason) = &self.blocking_reason {
            if *reason != BlockingReason::Unknown {
                write!(f, "\n\nBlocking reason: {}", reason.description())?;
            }
        }

        Ok(())
    }
}

// `error` is already part of the message, so it is not exposed as a source
impl std::error::Error for DownloadFailure {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::{CookieSource, NetworkConfig};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeExtractor {
        name: &'static str,
        available: bool,
        result: Result<(), DownloadError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Extractor for FakeExtractor {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn download(
            &self,
            _request: &DownloadRequest,
            _progress: &ProgressReporter,
        ) -> Result<(), DownloadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn fake(name: &'static str, available: bool, result: Result<(), DownloadError>) -> (Box<dyn Extractor>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = FakeExtractor {
            name,
            available,
            result,
            calls: calls.clone(),
        };
        (Box::new(extractor), calls)
    }

    fn request() -> DownloadRequest {
        DownloadRequest {
            url: "https://example.com/v".into(),
            work_dir: PathBuf::from("/tmp/w"),
            format_spec: "best".into(),
            merge_format: None,
            network: NetworkConfig::default(),
            cookies: CookieSource::None,
            player_client: None,
        }
    }

    #[tokio::test]
    async fn falls_back_to_second_extractor() {
        let (first, first_calls) = fake("first", true, Err(DownloadError::NetworkTimeout));
        let (second, second_calls) = fake("second", true, Ok(()));
        let mut downloader = Downloader::new();
        downloader.add_extractor(first);
        downloader.add_extractor(second);

        assert_eq!(downloader.download(&request()).await.unwrap(), "second");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn skips_unavailable_extractors() {
        let (first, first_calls) = fake("first", false, Ok(()));
        let (second, _) = fake("second", true, Ok(()));
        let mut downloader = Downloader::new();
        downloader.add_extractor(first);
        downloader.add_extractor(second);

        assert_eq!(downloader.download(&request()).await.unwrap(), "second");
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn permanent_errors_stop_the_chain() {
        let (first, _) = fake(
            "first",
            true,
            Err(DownloadError::InvalidUrl("ERROR: Unsupported URL: x".into())),
        );
        let (second, second_calls) = fake("second", true, Ok(()));
        let mut downloader = Downloader::new();
        downloader.add_extractor(first);
        downloader.add_extractor(second);

        let failure = downloader.download(&request()).await.unwrap_err();
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(failure.blocking_reason, Some(BlockingReason::UnsupportedUrl));
        assert_eq!(failure.used, Some("first"));
        assert!(!failure.tried_fallback);
    }

    #[tokio::test]
    async fn reports_last_error_with_suggestion() {
        let (first, _) = fake("first", true, Err(DownloadError::NetworkTimeout));
        let (second, _) = fake("second", true, Err(DownloadError::NetworkTimeout));
        let mut downloader = Downloader::new();
        downloader.add_extractor(first);
        downloader.add_extractor(second);

        let failure = downloader.download(&request()).await.unwrap_err();
        assert_eq!(failure.used, Some("second"));
        assert!(failure.tried_fallback);
        let text = failure.to_string();
        assert!(text.contains("after fallback"));
        // The hint is printed separately by the caller
        let suggestion = failure.suggestion().unwrap();
        assert!(suggestion.contains("--proxy"));
        assert!(!text.contains(&suggestion));
        assert!(std::error::Error::source(&failure).is_none());
    }

    #[tokio::test]
    async fn no_available_extractor() {
        let (only, _) = fake("only", false, Ok(()));
        let mut downloader = Downloader::new();
        downloader.add_extractor(only);

        let failure = downloader.download(&request()).await.unwrap_err();
        assert!(matches!(failure.error, DownloadError::ToolNotFound(_)));
        assert!(failure.suggestion().unwrap().contains("pip install yt-dlp"));
    }

    #[test]
    fn chains_per_mode() {
        let auto = Downloader::for_mode(ExtractorMode::Auto, None, "python3".into());
        assert_eq!(auto.extractor_names(), vec!["cli-yt-dlp", "python-yt_dlp"]);
        let py = Downloader::for_mode(ExtractorMode::Python, None, "python3".into());
        assert_eq!(py.extractor_names(), vec!["python-yt_dlp"]);
    }
}
