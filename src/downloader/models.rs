// Common data models for the extraction layer

use std::path::PathBuf;

/// Everything an extractor needs to fetch one video into a work directory
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    /// Directory yt-dlp writes into (`-P`)
    pub work_dir: PathBuf,
    /// yt-dlp format expression (`-f`)
    pub format_spec: String,
    /// Container handed to `--merge-output-format`, if mergeable
    pub merge_format: Option<String>,
    pub network: NetworkConfig,
    pub cookies: CookieSource,
    /// YouTube player client (android, web, tv)
    pub player_client: Option<String>,
}

/// Where yt-dlp should take cookies from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CookieSource {
    #[default]
    None,
    /// Netscape cookies.txt file
    File(PathBuf),
    /// Browser name for `--cookies-from-browser`
    Browser(String),
}

/// Download progress information
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub percent: f32,
    pub status: String,
}

/// Network configuration for extractors
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Proxy URL (e.g., "socks5h://127.0.0.1:1080")
    pub proxy: Option<String>,

    /// Socket timeout in seconds
    pub timeout: Option<u32>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: Some(30),
        }
    }
}
