//! The archive page: a single HTML file showing the video with its metadata.

mod escape;
mod meta;
mod template;

use std::collections::BTreeMap;

use time::Date;

pub use escape::{escape_html, escape_multiline};
pub use meta::SocialMeta;
pub use template::{render_template, RenderError, PAGE_TEMPLATE};

use crate::metadata::{format_duration, iso_date, VideoMetadata};

/// Everything the page needs besides the metadata itself
#[derive(Debug, Clone)]
pub struct PageInput<'a> {
    pub metadata: &'a VideoMetadata,
    /// URL the user asked for; used when the metadata has no page URL
    pub source_url: &'a str,
    /// Relative file name or a `data:` URI
    pub video_src: String,
    pub video_mime: &'static str,
    /// Thumbnail as a `data:` URI
    pub poster: Option<String>,
    /// Where the page will be served from, when known
    pub page_url: Option<String>,
    /// Public address of the video, for `og:video`
    pub public_video_url: Option<String>,
    pub archive_date: Date,
}

impl PageInput<'_> {
    fn social(&self) -> SocialMeta {
        let meta = self.metadata;
        SocialMeta {
            title: meta.title().to_string(),
            description: meta.description().to_string(),
            uploader: meta.uploader().to_string(),
            url: self
                .page_url
                .clone()
                .unwrap_or_else(|| meta.webpage_url(self.source_url).to_string()),
            image: meta
                .thumbnail
                .as_deref()
                .filter(|t| t.starts_with("http://") || t.starts_with("https://"))
                .map(String::from),
            video: self
                .public_video_url
                .clone()
                .map(|url| (url, self.video_mime.to_string())),
            duration: meta.duration_secs(),
            width: meta.width,
            height: meta.height,
            tags: meta.tags().to_vec(),
        }
    }
}

/// Render the page with the built-in template
pub fn render_page(input: &PageInput<'_>) -> Result<String, RenderError> {
    let meta = input.metadata;
    let mut values: BTreeMap<&str, String> = BTreeMap::new();

    values.insert("title", escape_html(meta.title()));
    values.insert("meta_tags", input.social().to_html());
    values.insert(
        "poster",
        input
            .poster
            .as_deref()
            .map(|uri| format!(" poster=\"{}\"", escape_html(uri)))
            .unwrap_or_default(),
    );
    values.insert("video_src", escape_html(&input.video_src));
    values.insert("video_mimetype", input.video_mime.to_string());
    values.insert("uploader", escape_html(meta.uploader()));
    values.insert("upload_date", escape_html(&meta.upload_date()));
    values.insert(
        "duration",
        meta.duration_secs()
            .map(|d| format!("        <p><strong>Duration:</strong> {}</p>\n", format_duration(d)))
            .unwrap_or_default(),
    );
    let description = meta.description().trim();
    values.insert(
        "description",
        if description.is_empty() {
            String::new()
        } else {
            format!(
                "        <p><strong>Description:</strong></p>\n        <p>{}</p>\n",
                escape_multiline(description)
            )
        },
    );
    values.insert("webpage_url", escape_html(meta.webpage_url(input.source_url)));
    values.insert("archive_date", iso_date(input.archive_date));

    render_template(PAGE_TEMPLATE, &values)
}
