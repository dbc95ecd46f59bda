// CLI extractor - uses the native `yt-dlp` binary
//
// Faster than Python mode and needs no Python installation.

use std::path::Path;
use std::process::Command as StdCommand;

use async_trait::async_trait;

use super::args::build_download_args;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::DownloadRequest;
use crate::downloader::traits::{Extractor, ProgressReporter};
use crate::downloader::utils::{run_output_with_timeout, run_with_progress};

/// CLI-based extractor using the yt-dlp binary
pub struct CliExtractor {
    ytdlp_path: String,
}

impl CliExtractor {
    /// Use `path` when given, otherwise search the usual install locations
    pub fn new(path: Option<String>) -> Self {
        Self {
            ytdlp_path: path.unwrap_or_else(find_ytdlp),
        }
    }
}

/// Find yt-dlp binary
pub fn find_ytdlp() -> String {
    let common_paths = [
        "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
        "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
        "/usr/bin/yt-dlp",          // System installation
    ];

    for path in common_paths {
        if Path::new(path).exists() {
            return path.to_string();
        }
    }

    if let Ok(output) = StdCommand::new("which").arg("yt-dlp").output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    // Last resort: hope it's in PATH
    "yt-dlp".to_string()
}

#[async_trait]
impl Extractor for CliExtractor {
    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }

    async fn is_available(&self) -> bool {
        match run_output_with_timeout(&self.ytdlp_path, vec!["--version".to_string()], 10).await {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        progress: &ProgressReporter,
    ) -> Result<(), DownloadError> {
        let args = build_download_args(request);
        tracing::info!(extractor = self.name(), path = %self.ytdlp_path, "starting download");
        run_with_progress(&self.ytdlp_path, &args, progress).await
    }
}
