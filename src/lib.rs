//! Archive an online video as a local file plus a shareable HTML page.

pub mod archive;
pub mod cleanup;
pub mod config;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod media;
pub mod metadata;
pub mod naming;
pub mod page;

pub use archive::{ArchiveOutcome, Archiver};
pub use config::{Config, FileConfig, Overrides};
pub use error::{Error, Result};

use downloader::tools::ToolManager;

/// Archive one URL with a resolved configuration
pub async fn run(url: &str, config: Config) -> Result<ArchiveOutcome> {
    tracing::debug!(?config, "resolved configuration");
    Archiver::new(config).run(url).await
}

/// Report which external tools can be found
pub async fn check_tools(config: &Config) -> Vec<downloader::tools::ToolInfo> {
    ToolManager::new(config.ytdlp_path.clone(), config.python.clone())
        .get_all_tools()
        .await
}
