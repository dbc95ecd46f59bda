// FormatSelector - turns a container + quality choice into a yt-dlp format spec

use std::fmt;
use std::str::FromStr;

/// Resolution cap requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Best,
    P1080,
    P720,
    P480,
    P360,
}

impl Quality {
    /// Maximum height in pixels, `None` for no cap
    pub fn max_height(&self) -> Option<u32> {
        match self {
            Self::Best => None,
            Self::P1080 => Some(1080),
            Self::P720 => Some(720),
            Self::P480 => Some(480),
            Self::P360 => Some(360),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_height() {
            Some(h) => write!(f, "{}p", h),
            None => write!(f, "best"),
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "1080p" | "1080" => Ok(Self::P1080),
            "720p" | "720" => Ok(Self::P720),
            "480p" | "480" => Ok(Self::P480),
            "360p" | "360" => Ok(Self::P360),
            other => Err(format!(
                "unknown quality '{}' (expected best, 1080p, 720p, 480p or 360p)",
                other
            )),
        }
    }
}

/// Containers `--merge-output-format` accepts
const MERGEABLE: &[&str] = &["mp4", "webm", "mkv", "mov", "avi", "flv"];

pub struct FormatSelector;

impl FormatSelector {
    /// Get format spec for yt-dlp based on container and quality.
    ///
    /// `mp4` + `best` gives `bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best`.
    pub fn get_format_spec(container: &str, quality: Quality) -> String {
        let ext = container.to_lowercase();
        let height = quality
            .max_height()
            .map(|h| format!("[height<={}]", h))
            .unwrap_or_default();
        let audio = match Self::audio_ext_for(&ext) {
            Some(a) => format!("bestaudio[ext={}]", a),
            None => "bestaudio".to_string(),
        };

        let mut spec = format!(
            "bestvideo[ext={ext}]{height}+{audio}/best[ext={ext}]{height}",
            ext = ext,
            height = height,
            audio = audio
        );
        if !height.is_empty() {
            spec.push_str(&format!("/best{}", height));
        }
        spec.push_str("/best");
        spec
    }

    /// Container to merge into, when yt-dlp can produce it
    pub fn merge_format(container: &str) -> Option<String> {
        let ext = container.to_lowercase();
        MERGEABLE.contains(&ext.as_str()).then_some(ext)
    }

    /// Audio stream extension that muxes cleanly into the container
    fn audio_ext_for(container: &str) -> Option<&'static str> {
        match container {
            "mp4" | "mov" | "m4v" => Some("m4a"),
            "webm" => Some("webm"),
            _ => None,
        }
    }
}
