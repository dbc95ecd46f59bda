//! MIME types, base64 embedding and thumbnail retrieval.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Error, Result};

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov", "m4v", "ogg", "ogv", "avi", "flv"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Return the MIME type based on video file extension
pub fn video_mime_type(file_extension: &str) -> &'static str {
    match file_extension.to_lowercase().as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        _ => "video/mp4",
    }
}

/// Return the MIME type based on image file extension
pub fn image_mime_type(file_extension: &str) -> &'static str {
    match file_extension.to_lowercase().as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Embedded image, ready for a `poster`/`src` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Thumbnail {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::io("read", path, e))?;
        Ok(Self {
            mime: image_mime_type(&extension_of(path)),
            bytes,
        })
    }

    pub fn data_uri(&self) -> String {
        data_uri(self.mime, &self.bytes)
    }
}

/// Fetch a remote thumbnail, through `proxy` when set
pub async fn fetch_thumbnail(url: &str, proxy: Option<&str>) -> Result<Thumbnail> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("sumvideo/", env!("CARGO_PKG_VERSION")));
    // Only the configured proxy applies, never the environment's
    builder = match proxy {
        Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url)?),
        None => builder.no_proxy(),
    };
    let client = builder.build()?;

    let response = client.get(url).send().await?.error_for_status()?;
    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_lowercase());
    let bytes = response.bytes().await?.to_vec();

    // Trust the server when it says image/*, else guess from the URL
    let mime = match mime.as_deref() {
        Some("image/png") => "image/png",
        Some("image/webp") => "image/webp",
        Some("image/gif") => "image/gif",
        Some("image/jpeg") => "image/jpeg",
        _ => {
            let path = url.split(['?', '#']).next().unwrap_or(url);
            image_mime_type(&extension_of(Path::new(path)))
        }
    };
    tracing::debug!(url, mime, size = bytes.len(), "fetched thumbnail");
    Ok(Thumbnail { mime, bytes })
}

/// Files yt-dlp left in a work directory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkFiles {
    pub info_json: Option<PathBuf>,
    pub video: Option<PathBuf>,
    pub thumbnail: Option<PathBuf>,
}

/// Sort the work directory. `id`/`ext` from the info json pick the video
/// when several candidates exist (e.g. leftover format-specific streams).
pub fn scan_work_dir(dir: &Path, id: Option<&str>, ext: Option<&str>) -> Result<WorkFiles> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("list", dir, e))?;

    let mut files = WorkFiles::default();
    let mut videos = Vec::new();
    let mut images = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::io("list", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_ext = extension_of(&path);

        if name.ends_with(".info.json") {
            files.info_json = Some(path);
        } else if name.ends_with(".part") || name.ends_with(".ytdl") || file_ext == "json" {
            continue;
        } else if VIDEO_EXTENSIONS.contains(&file_ext.as_str()) {
            videos.push(path);
        } else if IMAGE_EXTENSIONS.contains(&file_ext.as_str()) {
            images.push(path);
        }
    }
    videos.sort();
    images.sort();

    if let (Some(id), Some(ext)) = (id, ext) {
        let expected = dir.join(format!("{}.{}", id, ext));
        if videos.contains(&expected) {
            files.video = Some(expected);
        }
    }
    if files.video.is_none() {
        // Intermediate streams are named `<id>.f<format>.<ext>`
        files.video = videos
            .iter()
            .find(|p| !is_format_stream(p))
            .or_else(|| videos.first())
            .cloned();
    }
    files.thumbnail = images.into_iter().next();

    Ok(files)
}

fn is_format_stream(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| Path::new(s).extension())
        .map(|e| {
            let e = e.to_string_lossy();
            let rest = e.strip_prefix('f').unwrap_or("");
            rest.chars().any(|c| c.is_ascii_digit())
                && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .unwrap_or(false)
}
