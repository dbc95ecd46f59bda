// Downloader module - runs yt-dlp and reports what it did

pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod tools;
pub mod traits;
pub mod utils;

pub use errors::DownloadError;
pub use extractors::ExtractorMode;
pub use format_selector::{FormatSelector, Quality};
pub use models::{CookieSource, DownloadProgress, DownloadRequest, NetworkConfig};
pub use orchestrator::{DownloadFailure, Downloader};
pub use traits::{Extractor, ProgressReporter};
