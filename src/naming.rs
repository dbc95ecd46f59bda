//! File names for the archived video and its page.

use std::path::{Path, PathBuf};

use slug::slugify;

use crate::metadata::VideoMetadata;

/// Slug of `"<title> <YYYY-MM-DD>"`, falling back to the id, then `video`
pub fn slug_for(metadata: &VideoMetadata) -> String {
    let base = match metadata.upload_date_iso() {
        Some(date) => format!("{} {}", metadata.title(), date),
        None => metadata.title().to_string(),
    };

    let title_slug = slugify(metadata.title());
    if !title_slug.is_empty() {
        return slugify(base);
    }

    let id_slug = metadata.id.as_deref().map(slugify).unwrap_or_default();
    let fallback = if id_slug.is_empty() { "video".to_string() } else { id_slug };
    match metadata.upload_date_iso() {
        Some(date) => format!("{}-{}", fallback, date),
        None => fallback,
    }
}

/// Final locations of the page and (optionally) the video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub stem: String,
    pub html: PathBuf,
    pub video: Option<PathBuf>,
}

/// Pick `<slug>.html` (and `<slug>.<ext>`), adding `-2`, `-3`, ... to the
/// stem until neither exists. With `overwrite` the plain slug is used.
pub fn choose_output_names(
    dir: &Path,
    slug: &str,
    video_ext: Option<&str>,
    overwrite: bool,
) -> OutputNames {
    let build = |stem: String| {
        let html = dir.join(format!("{}.html", stem));
        let video = video_ext.map(|ext| dir.join(format!("{}.{}", stem, ext)));
        OutputNames { stem, html, video }
    };

    let first = build(slug.to_string());
    if overwrite || !first.taken() {
        return first;
    }

    let mut n = 2u32;
    loop {
        let candidate = build(format!("{}-{}", slug, n));
        if !candidate.taken() {
            return candidate;
        }
        n += 1;
    }
}

impl OutputNames {
    fn taken(&self) -> bool {
        self.html.exists() || self.video.as_ref().map_or(false, |v| v.exists())
    }
}

/// File name as it goes into an HTML `src`/`href`
pub fn url_safe_file_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    urlencoding::encode(&name).into_owned()
}
