// Python extractor - uses `python3 -m yt_dlp`
//
// Works wherever the yt_dlp module is pip-installed, including virtualenvs
// selected through YTDLP_PYTHON.

use async_trait::async_trait;

use super::args::build_download_args;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::DownloadRequest;
use crate::downloader::traits::{Extractor, ProgressReporter};
use crate::downloader::utils::{run_output_with_timeout, run_with_progress};

/// Python-based extractor using the yt_dlp module
pub struct PythonExtractor {
    python_cmd: String,
}

impl PythonExtractor {
    pub fn new(python_cmd: String) -> Self {
        Self { python_cmd }
    }

    /// Full argument list including `-m yt_dlp`
    fn build_args(&self, request: &DownloadRequest) -> Vec<String> {
        let mut args = vec!["-m".to_string(), "yt_dlp".to_string()];
        args.extend(build_download_args(request));
        args
    }
}

#[async_trait]
impl Extractor for PythonExtractor {
    fn name(&self) -> &'static str {
        "python-yt_dlp"
    }

    /// Check if the yt_dlp module is importable
    async fn is_available(&self) -> bool {
        let args = vec!["-c".to_string(), "import yt_dlp".to_string()];
        match run_output_with_timeout(&self.python_cmd, args, 20).await {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        progress: &ProgressReporter,
    ) -> Result<(), DownloadError> {
        let args = self.build_args(request);
        tracing::info!(extractor = self.name(), python = %self.python_cmd, "starting download");
        run_with_progress(&self.python_cmd, &args, progress).await
    }
}
