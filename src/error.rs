// Crate-level error type

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::downloader::DownloadFailure;
use crate::page::RenderError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("download failed")]
    Download(#[from] DownloadFailure),

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid metadata in {}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// yt-dlp reported success but left no file of this kind behind
    #[error("yt-dlp produced no {what} in {}", dir.display())]
    MissingOutput { what: &'static str, dir: PathBuf },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("thumbnail fetch failed")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

impl Error {
    /// The message followed by every source, joined with `: `
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

pub type Result<T> = std::result::Result<T, Error>;
