//! Ties the pieces together: download, name, embed, render, clean up.

use std::fs;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use crate::cleanup::WorkDir;
use crate::config::{Config, ProxySetting};
use crate::downloader::utils::auto_detect_proxy;
use crate::downloader::{DownloadRequest, Downloader, FormatSelector, NetworkConfig};
use crate::error::{Error, Result};
use crate::media::{data_uri, extension_of, fetch_thumbnail, scan_work_dir, video_mime_type, Thumbnail};
use crate::metadata::VideoMetadata;
use crate::naming::{choose_output_names, slug_for, url_safe_file_name};
use crate::page::{render_page, PageInput};

/// Result of archiving one video
#[derive(Debug, Clone)]
pub struct ArchiveOutcome {
    pub html_path: PathBuf,
    /// Standalone pages embed the video; it then only has a path when the
    /// work directory was kept
    pub video_path: Option<PathBuf>,
    /// Set when the work directory was kept
    pub work_dir: Option<PathBuf>,
    pub metadata: VideoMetadata,
}

pub struct Archiver {
    config: Config,
    downloader: Downloader,
}

impl Archiver {
    pub fn new(config: Config) -> Self {
        let downloader =
            Downloader::for_mode(config.extractor, config.ytdlp_path.clone(), config.python.clone());
        Self::with_downloader(config, downloader)
    }

    pub fn with_downloader(config: Config, downloader: Downloader) -> Self {
        Self { config, downloader }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Archive `url` into the output directory
    pub async fn run(&self, url: &str) -> Result<ArchiveOutcome> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| Error::io("create", output_dir, e))?;

        let work = WorkDir::create_in(output_dir)?;
        let result = self.archive_into(url, work.path()).await;

        match result {
            Ok((mut outcome, embedded)) => {
                outcome.work_dir = work.finish(self.config.cleanup)?;
                if let (Some(kept), Some(name)) = (&outcome.work_dir, embedded) {
                    outcome.video_path = Some(kept.join(name));
                }
                Ok(outcome)
            }
            Err(e) => {
                match work.finish(self.config.cleanup) {
                    Ok(Some(kept)) => {
                        tracing::warn!(path = %kept.display(), "work directory kept after failure")
                    }
                    Ok(None) => {}
                    Err(cleanup_err) => {
                        tracing::warn!(error = %cleanup_err.report(), "could not clean up after failure")
                    }
                }
                Err(e)
            }
        }
    }

    /// Returns the outcome and, for standalone pages, the embedded file's name
    async fn archive_into(&self, url: &str, work_dir: &Path) -> Result<(ArchiveOutcome, Option<PathBuf>)> {
        let config = &self.config;
        let proxy = self.resolve_proxy().await;

        let request = DownloadRequest {
            url: url.to_string(),
            work_dir: work_dir.to_path_buf(),
            format_spec: FormatSelector::get_format_spec(&config.format, config.quality),
            merge_format: FormatSelector::merge_format(&config.format),
            network: NetworkConfig {
                proxy: proxy.clone(),
                timeout: Some(config.timeout_secs),
            },
            cookies: config.cookies.clone(),
            player_client: config.player_client.clone(),
        };
        tracing::info!(url, format = %config.format, quality = %config.quality, "downloading");
        let used = self.downloader.download(&request).await?;
        tracing::debug!(extractor = used, "download complete");

        let info_json = scan_work_dir(work_dir, None, None)?
            .info_json
            .ok_or_else(|| Error::MissingOutput {
                what: "metadata file",
                dir: work_dir.to_path_buf(),
            })?;
        let metadata = VideoMetadata::load(&info_json)?;
        tracing::debug!(title = metadata.title(), id = ?metadata.id, "read metadata");

        let files = scan_work_dir(work_dir, metadata.id.as_deref(), metadata.ext.as_deref())?;
        let video = files.video.ok_or_else(|| Error::MissingOutput {
            what: "video file",
            dir: work_dir.to_path_buf(),
        })?;
        let video_ext = extension_of(&video);
        let video_mime = video_mime_type(&video_ext);

        let slug = slug_for(&metadata);
        let names = choose_output_names(
            &config.output_dir,
            &slug,
            (!config.standalone).then_some(video_ext.as_str()),
            config.overwrite,
        );

        let video_src = match &names.video {
            Some(target) => url_safe_file_name(target),
            None => {
                let bytes = tokio::fs::read(&video)
                    .await
                    .map_err(|e| Error::io("read", &video, e))?;
                tracing::debug!(size = bytes.len(), "embedding video");
                data_uri(video_mime, &bytes)
            }
        };

        let poster = self
            .thumbnail(files.thumbnail.as_deref(), &metadata, proxy.as_deref())
            .await
            .map(|t| t.data_uri());

        let page_url = config
            .base_url
            .as_ref()
            .map(|base| format!("{}/{}", base, url_safe_file_name(&names.html)));
        let public_video_url = match (&config.base_url, &names.video) {
            (Some(base), Some(path)) => Some(format!("{}/{}", base, url_safe_file_name(path))),
            _ => None,
        };

        let html = render_page(&PageInput {
            metadata: &metadata,
            source_url: url,
            video_src,
            video_mime,
            poster,
            page_url,
            public_video_url,
            archive_date: today(),
        })?;
        fs::write(&names.html, html).map_err(|e| Error::io("write", &names.html, e))?;
        tracing::info!(path = %names.html.display(), "wrote page");

        // The video moves last; a page whose video never arrived is removed
        let video_path = match &names.video {
            Some(target) => {
                if let Err(e) = move_file(&video, target, config.overwrite) {
                    if let Err(rm) = fs::remove_file(&names.html) {
                        tracing::warn!(path = %names.html.display(), error = %rm, "could not remove page");
                    }
                    return Err(e);
                }
                tracing::info!(path = %target.display(), "saved video");
                Some(target.clone())
            }
            None => None,
        };

        let embedded = match video_path {
            Some(_) => None,
            None => video.file_name().map(PathBuf::from),
        };
        Ok((
            ArchiveOutcome {
                html_path: names.html,
                video_path,
                work_dir: None,
                metadata,
            },
            embedded,
        ))
    }

    async fn resolve_proxy(&self) -> Option<String> {
        match &self.config.proxy {
            ProxySetting::None => None,
            ProxySetting::Url(url) => Some(url.clone()),
            ProxySetting::Auto => tokio::task::spawn_blocking(auto_detect_proxy)
                .await
                .unwrap_or(None),
        }
    }

    /// Local thumbnail first, then the remote one. Failures only cost the poster.
    async fn thumbnail(
        &self,
        local: Option<&Path>,
        metadata: &VideoMetadata,
        proxy: Option<&str>,
    ) -> Option<Thumbnail> {
        if let Some(path) = local {
            match Thumbnail::read(path) {
                Ok(thumb) => return Some(thumb),
                Err(e) => tracing::warn!(error = %e.report(), "could not read thumbnail"),
            }
        }

        let remote = metadata
            .thumbnail
            .as_deref()
            .filter(|u| u.starts_with("http://") || u.starts_with("https://"));
        match remote {
            Some(url) if self.config.fetch_thumbnail => match fetch_thumbnail(url, proxy).await {
                Ok(thumb) => Some(thumb),
                Err(e) => {
                    tracing::warn!(url, error = %e.report(), "could not fetch thumbnail");
                    None
                }
            },
            _ => {
                tracing::debug!("no thumbnail available");
                None
            }
        }
    }
}

fn move_file(from: &Path, to: &Path, overwrite: bool) -> Result<()> {
    if overwrite && to.exists() {
        fs::remove_file(to).map_err(|e| Error::io("replace", to, e))?;
    }
    fs::rename(from, to).map_err(|e| Error::io("move video to", to, e))
}

fn today() -> time::Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
