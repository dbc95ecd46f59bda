// Extractor trait definition

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{DownloadProgress, DownloadRequest};
use super::progress::parse_ytdlp_progress;

/// Trait for extractor implementations
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Check if the underlying tool can be run at all
    async fn is_available(&self) -> bool;

    /// Download the video, info json and thumbnail into `request.work_dir`
    async fn download(
        &self,
        request: &DownloadRequest,
        progress: &ProgressReporter,
    ) -> Result<(), DownloadError>;
}

/// Turns yt-dlp output lines into log events.
///
/// Every recognised line is logged at debug level; info level only sees
/// the start, each 10% step and the merge.
#[derive(Debug, Default)]
pub struct ProgressReporter {
    last_step: std::sync::atomic::AtomicU32,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one stdout line. Returns the parsed progress, if any.
    pub fn line(&self, line: &str) -> Option<DownloadProgress> {
        let (percent, status) = parse_ytdlp_progress(line)?;
        tracing::debug!(percent, "{}", status);
        if self.is_milestone(percent) {
            tracing::info!("{}", status);
        }
        Some(DownloadProgress { percent, status })
    }

    /// True at 0% (a new stream starts) and the first time each 10% step
    /// is reached
    fn is_milestone(&self, percent: f32) -> bool {
        use std::sync::atomic::Ordering;

        if percent <= 0.0 {
            self.last_step.store(0, Ordering::Relaxed);
            return true;
        }
        let step = (percent / 10.0).floor() as u32;
        self.last_step.fetch_max(step, Ordering::Relaxed) < step
    }
}
