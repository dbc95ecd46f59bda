//! Runtime configuration.
//!
//! Options come from the command line, an optional TOML file and a few
//! environment variables, in that order of precedence.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::cleanup::CleanupPolicy;
use crate::downloader::{CookieSource, ExtractorMode, Quality};

pub const CONFIG_ENV: &str = "SUMVIDEO_CONFIG";
pub const VIDEOS_DIR_ENV: &str = "SUMVIDEO_DIR";
pub const XDG_VIDEOS_DIR_ENV: &str = "XDG_VIDEOS_DIR";
pub const PYTHON_ENV: &str = "YTDLP_PYTHON";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("cannot determine the current directory")]
    CurrentDir(#[source] std::io::Error),
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub quality: Option<String>,
    pub standalone: Option<bool>,
    pub keep_temp: Option<bool>,
    pub extractor: Option<ExtractorMode>,
    pub ytdlp_path: Option<String>,
    pub python: Option<String>,
    pub proxy: Option<String>,
    pub cookies: Option<PathBuf>,
    pub cookies_from_browser: Option<String>,
    pub player_client: Option<String>,
    pub timeout_secs: Option<u32>,
    pub base_url: Option<String>,
    pub fetch_thumbnail: Option<bool>,
    pub overwrite: Option<bool>,
}

impl FileConfig {
    /// Load from `path`; a missing file yields the empty config
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        tracing::debug!(path = %path.display(), "loading config file");
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `$SUMVIDEO_CONFIG`, else `<config dir>/sumvideo/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join("sumvideo").join("config.toml")))
    }
}

/// Options given on the command line; `None` means "not given"
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub quality: Option<String>,
    pub standalone: bool,
    pub keep_temp: bool,
    pub extractor: Option<ExtractorMode>,
    pub ytdlp_path: Option<String>,
    pub proxy: Option<String>,
    pub cookies: Option<PathBuf>,
    pub cookies_from_browser: Option<String>,
    pub base_url: Option<String>,
    pub no_thumbnail_fetch: bool,
    pub overwrite: bool,
}

/// Proxy setting before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySetting {
    None,
    /// Probe local SOCKS5 ports at run time
    Auto,
    Url(String),
}

impl ProxySetting {
    fn parse(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            None | Some("") | Some("none") => Self::None,
            Some("auto") => Self::Auto,
            Some(url) => Self::Url(url.to_string()),
        }
    }
}

/// Fully resolved options
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub format: String,
    pub quality: Quality,
    pub standalone: bool,
    pub cleanup: CleanupPolicy,
    pub extractor: ExtractorMode,
    pub ytdlp_path: Option<String>,
    pub python: String,
    pub proxy: ProxySetting,
    pub cookies: CookieSource,
    pub player_client: Option<String>,
    pub timeout_secs: u32,
    pub base_url: Option<String>,
    pub fetch_thumbnail: bool,
    pub overwrite: bool,
}

impl Config {
    /// Merge command line, file and environment
    pub fn resolve(cli: Overrides, file: FileConfig) -> Result<Self, ConfigError> {
        let output_dir = match cli.output_dir.or(file.output_dir) {
            Some(dir) => expand_tilde(&dir),
            None => default_output_dir()?,
        };

        let format = cli
            .format
            .or(file.format)
            .unwrap_or_else(|| "mp4".to_string())
            .trim()
            .trim_start_matches('.')
            .to_lowercase();
        if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Invalid {
                key: "format",
                message: format!("'{}' is not a file extension", format),
            });
        }

        let quality = match cli.quality.or(file.quality) {
            Some(q) => q
                .parse()
                .map_err(|message| ConfigError::Invalid { key: "quality", message })?,
            None => Quality::default(),
        };

        let cleanup = if cli.keep_temp || file.keep_temp.unwrap_or(false) {
            CleanupPolicy::Keep
        } else {
            CleanupPolicy::RemoveTemp
        };

        let cookies = match (cli.cookies, cli.cookies_from_browser) {
            (Some(path), _) => CookieSource::File(expand_tilde(&path)),
            (None, Some(browser)) => CookieSource::Browser(browser),
            (None, None) => match (file.cookies, file.cookies_from_browser) {
                (Some(path), _) => CookieSource::File(expand_tilde(&path)),
                (None, Some(browser)) => CookieSource::Browser(browser),
                (None, None) => CookieSource::None,
            },
        };

        let base_url = cli
            .base_url
            .or(file.base_url)
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        Ok(Self {
            output_dir,
            format,
            quality,
            standalone: cli.standalone || file.standalone.unwrap_or(false),
            cleanup,
            extractor: cli.extractor.or(file.extractor).unwrap_or_default(),
            ytdlp_path: cli.ytdlp_path.or(file.ytdlp_path),
            python: file
                .python
                .or_else(|| env::var(PYTHON_ENV).ok().filter(|v| !v.is_empty()))
                .unwrap_or_else(|| "python3".to_string()),
            proxy: ProxySetting::parse(cli.proxy.or(file.proxy)),
            cookies,
            player_client: file.player_client,
            timeout_secs: file.timeout_secs.unwrap_or(30),
            base_url,
            fetch_thumbnail: !cli.no_thumbnail_fetch && file.fetch_thumbnail.unwrap_or(true),
            overwrite: cli.overwrite || file.overwrite.unwrap_or(false),
        })
    }
}

/// `$XDG_VIDEOS_DIR`, then `$SUMVIDEO_DIR`, then `./videos`
pub fn default_output_dir() -> Result<PathBuf, ConfigError> {
    for key in [XDG_VIDEOS_DIR_ENV, VIDEOS_DIR_ENV] {
        if let Some(dir) = env::var_os(key).filter(|v| !v.is_empty()) {
            return Ok(expand_tilde(Path::new(&dir)));
        }
    }
    let cwd = env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join("videos"))
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(cli: Overrides, file: FileConfig) -> Config {
        let mut cli = cli;
        if cli.output_dir.is_none() && file.output_dir.is_none() {
            cli.output_dir = Some(PathBuf::from("/tmp/out"));
        }
        Config::resolve(cli, file).unwrap()
    }

    #[test]
    fn defaults() {
        let config = resolve(Overrides::default(), FileConfig::default());
        assert_eq!(config.format, "mp4");
        assert_eq!(config.quality, Quality::Best);
        assert!(!config.standalone);
        assert_eq!(config.cleanup, CleanupPolicy::RemoveTemp);
        assert_eq!(config.extractor, ExtractorMode::Auto);
        assert_eq!(config.proxy, ProxySetting::None);
        assert_eq!(config.cookies, CookieSource::None);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.fetch_thumbnail);
        assert!(!config.overwrite);
    }

    #[test]
    fn command_line_beats_file() {
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/srv/videos")),
            format: Some("webm".into()),
            quality: Some("480p".into()),
            extractor: Some(ExtractorMode::Python),
            proxy: Some("auto".into()),
            base_url: Some("https://files.example.org/v/".into()),
            ..FileConfig::default()
        };
        let cli = Overrides {
            output_dir: Some(PathBuf::from("/tmp/cli")),
            format: Some(".MP4".into()),
            extractor: Some(ExtractorMode::Cli),
            ..Overrides::default()
        };
        let config = resolve(cli, file);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/cli"));
        assert_eq!(config.format, "mp4");
        assert_eq!(config.quality, Quality::P480);
        assert_eq!(config.extractor, ExtractorMode::Cli);
        assert_eq!(config.proxy, ProxySetting::Auto);
        assert_eq!(config.base_url.as_deref(), Some("https://files.example.org/v"));
    }

    #[test]
    fn flags_and_cookies() {
        let file = FileConfig {
            keep_temp: Some(true),
            fetch_thumbnail: Some(true),
            cookies_from_browser: Some("firefox".into()),
            ..FileConfig::default()
        };
        let cli = Overrides {
            standalone: true,
            no_thumbnail_fetch: true,
            cookies: Some(PathBuf::from("/tmp/cookies.txt")),
            ..Overrides::default()
        };
        let config = resolve(cli, file);
        assert!(config.standalone);
        assert_eq!(config.cleanup, CleanupPolicy::Keep);
        assert!(!config.fetch_thumbnail);
        assert_eq!(config.cookies, CookieSource::File(PathBuf::from("/tmp/cookies.txt")));
    }

    #[test]
    fn rejects_bad_values() {
        let cli = Overrides {
            output_dir: Some(PathBuf::from("/tmp/out")),
            quality: Some("8k".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            Config::resolve(cli, FileConfig::default()),
            Err(ConfigError::Invalid { key: "quality", .. })
        ));

        let cli = Overrides {
            output_dir: Some(PathBuf::from("/tmp/out")),
            format: Some("mp4; rm".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            Config::resolve(cli, FileConfig::default()),
            Err(ConfigError::Invalid { key: "format", .. })
        ));
    }

    #[test]
    fn proxy_setting_parsing() {
        assert_eq!(ProxySetting::parse(None), ProxySetting::None);
        assert_eq!(ProxySetting::parse(Some(" auto ".into())), ProxySetting::Auto);
        assert_eq!(
            ProxySetting::parse(Some("socks5h://127.0.0.1:1080".into())),
            ProxySetting::Url("socks5h://127.0.0.1:1080".into())
        );
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "output_dir = \"/data/videos\"\nformat = \"webm\"\nstandalone = true\nextractor = \"python\"\n",
        )
        .unwrap();
        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.output_dir, Some(PathBuf::from("/data/videos")));
        assert_eq!(file.format.as_deref(), Some("webm"));
        assert_eq!(file.standalone, Some(true));
        assert_eq!(file.extractor, Some(ExtractorMode::Python));
    }

    #[test]
    fn missing_file_is_empty_and_bad_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            FileConfig::load(&dir.path().join("absent.toml")).unwrap(),
            FileConfig::default()
        );

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "colour = \"blue\"\n").unwrap();
        assert!(matches!(FileConfig::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn tilde_expansion() {
        assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/Videos")), home.join("Videos"));
        }
    }
}
