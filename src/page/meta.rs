// Open Graph and Twitter Card tags for link previews

use super::escape::escape_html;

const DESCRIPTION_LIMIT: usize = 200;
const TAG_LIMIT: usize = 10;

/// Inputs for the social preview tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialMeta {
    pub title: String,
    pub description: String,
    pub uploader: String,
    /// Canonical address of the page
    pub url: String,
    /// Remote thumbnail; omitted from the tags when absent
    pub image: Option<String>,
    /// Public address of the video file
    pub video: Option<(String, String)>,
    pub duration: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tags: Vec<String>,
}

impl SocialMeta {
    /// Description for previews: trimmed to `DESCRIPTION_LIMIT` characters,
    /// or a byline when the video has none
    pub fn preview_description(&self) -> String {
        let text = self.description.trim();
        if text.is_empty() {
            return format!("Video by {}", self.uploader);
        }
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= DESCRIPTION_LIMIT {
            flat
        } else {
            let cut: String = flat.chars().take(DESCRIPTION_LIMIT - 3).collect();
            format!("{}...", cut.trim_end())
        }
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Player cards need an https page to frame and the player size
    fn player(&self) -> Option<(&String, &String, u32, u32)> {
        let (video_url, mime) = self.video.as_ref()?;
        let (width, height) = self.dimensions()?;
        self.url
            .starts_with("https://")
            .then_some((video_url, mime, width, height))
    }

    /// `<meta>` lines, one per tag, already escaped
    pub fn to_html(&self) -> String {
        let description = self.preview_description();
        let mut tags: Vec<(&str, &str, String)> = vec![
            ("name", "description", description.clone()),
            ("property", "og:type", "video.other".to_string()),
            ("property", "og:title", self.title.clone()),
            ("property", "og:description", description.clone()),
            ("property", "og:url", self.url.clone()),
        ];
        if let Some(image) = &self.image {
            tags.push(("property", "og:image", image.clone()));
        }
        if let Some((video_url, mime)) = &self.video {
            tags.push(("property", "og:video", video_url.clone()));
            tags.push(("property", "og:video:type", mime.clone()));
            if let Some((width, height)) = self.dimensions() {
                tags.push(("property", "og:video:width", width.to_string()));
                tags.push(("property", "og:video:height", height.to_string()));
            }
        }
        if let Some(duration) = self.duration {
            tags.push(("property", "og:video:duration", duration.to_string()));
        }
        for tag in self.tags.iter().filter(|t| !t.trim().is_empty()).take(TAG_LIMIT) {
            tags.push(("property", "video:tag", tag.trim().to_string()));
        }

        let player = self.player();
        let card = if player.is_some() {
            "player"
        } else {
            "summary_large_image"
        };
        tags.push(("name", "twitter:card", card.to_string()));
        tags.push(("name", "twitter:title", self.title.clone()));
        tags.push(("name", "twitter:description", description));
        if let Some(image) = &self.image {
            tags.push(("name", "twitter:image", image.clone()));
        }
        if let Some((video_url, mime, width, height)) = player {
            // The page itself is the player; the file is its stream
            tags.push(("name", "twitter:player", self.url.clone()));
            tags.push(("name", "twitter:player:width", width.to_string()));
            tags.push(("name", "twitter:player:height", height.to_string()));
            tags.push(("name", "twitter:player:stream", video_url.clone()));
            tags.push(("name", "twitter:player:stream:content_type", mime.clone()));
        }

        tags.iter()
            .map(|(attr, key, value)| {
                format!(
                    "    <meta {}=\"{}\" content=\"{}\">",
                    attr,
                    key,
                    escape_html(value)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
