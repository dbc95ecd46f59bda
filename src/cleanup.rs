//! What happens to the yt-dlp work directory once the page is written.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    /// Delete the work directory: info json, thumbnail, partial files and,
    /// in standalone mode, the embedded video
    #[default]
    RemoveTemp,
    /// Leave the work directory in place
    Keep,
}

/// Scratch directory inside the output directory.
///
/// Living next to the final files keeps moves out of it plain renames.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    pub fn create_in(output_dir: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(".sumvideo-")
            .tempdir_in(output_dir)
            .map_err(|e| Error::io("create work directory in", output_dir, e))?;
        tracing::debug!(path = %dir.path().display(), "created work directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Apply the policy. Returns the directory when it was kept.
    pub fn finish(self, policy: CleanupPolicy) -> Result<Option<PathBuf>> {
        match policy {
            CleanupPolicy::Keep => {
                let kept = self.dir.keep();
                tracing::info!(path = %kept.display(), "keeping temporary files");
                Ok(Some(kept))
            }
            CleanupPolicy::RemoveTemp => {
                let path = self.dir.path().to_path_buf();
                self.dir
                    .close()
                    .map_err(|e| Error::io("remove work directory", &path, e))?;
                tracing::debug!(path = %path.display(), "removed work directory");
                Ok(None)
            }
        }
    }
}
