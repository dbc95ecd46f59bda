// Blocking diagnostics - identifies why a download was refused
//
// Analyzes yt-dlp error output to determine the type of blocking and a
// recommended action for the user.

/// Reasons why a video site might refuse a download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// HTTP 403 Forbidden - general access denied
    Http403Forbidden,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Geographic restriction
    GeoBlocked,

    /// Network timeout (soft IP block)
    NetworkTimeout,

    /// Rate limiting (429 or similar)
    RateLimited,

    /// Bot detection triggered
    BotDetection,

    /// Private video requiring authorization
    PrivateVideo,

    /// Video deleted or unavailable
    VideoUnavailable,

    /// DRM-protected content, cannot be downloaded at all
    DrmProtected,

    /// No extractor for this site
    UnsupportedUrl,

    /// Generic/unknown blocking
    Unknown,
}

impl BlockingReason {
    /// Check if cookies might help
    pub fn cookies_might_help(&self) -> bool {
        matches!(
            self,
            Self::Http403Forbidden | Self::AgeRestricted | Self::BotDetection | Self::PrivateVideo
        )
    }

    /// Check if proxy might help
    pub fn proxy_might_help(&self) -> bool {
        matches!(
            self,
            Self::Http403Forbidden
                | Self::GeoBlocked
                | Self::NetworkTimeout
                | Self::RateLimited
                | Self::BotDetection
        )
    }

    /// Check if this is a permanent restriction (no workaround)
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::DrmProtected | Self::VideoUnavailable | Self::UnsupportedUrl
        )
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::NetworkTimeout => "Network timeout (possible IP throttling)",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection triggered",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::UnsupportedUrl => "Unsupported URL",
            Self::Unknown => "Unknown error",
        }
    }

    /// What the user can try next
    pub fn suggestion(&self) -> String {
        let mut tips: Vec<&str> = Vec::new();
        match self {
            Self::DrmProtected => {
                return "The video is DRM-protected and cannot be downloaded.".to_string()
            }
            Self::VideoUnavailable => {
                return "The video was removed, made private or never existed.".to_string()
            }
            Self::UnsupportedUrl => {
                return "yt-dlp has no extractor for this URL. Check the link, or update yt-dlp."
                    .to_string()
            }
            Self::RateLimited => tips.push("Wait 10-15 minutes before retrying"),
            Self::Unknown => {
                tips.push("Check the video URL");
                tips.push("Update yt-dlp (yt-dlp -U or pip install -U yt-dlp)");
            }
            _ => {}
        }
        if self.cookies_might_help() {
            tips.push("Pass cookies (--cookies FILE or --cookies-from-browser NAME)");
        }
        if self.proxy_might_help() {
            tips.push("Use a proxy (--proxy URL, or --proxy auto)");
        }
        if matches!(self, Self::GeoBlocked) {
            tips.push("Use a VPN or proxy located in an allowed region");
        }

        let mut out = String::from("What to try:");
        for (i, tip) in tips.iter().enumerate() {
            out.push_str(&format!("\n {}) {}", i + 1, tip));
        }
        out
    }
}

/// Map yt-dlp error output to a blocking reason.
///
/// Returns `None` for empty input.
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    if error.trim().is_empty() {
        return None;
    }
    let e = error.to_lowercase();

    let reason = if e.contains("drm") {
        BlockingReason::DrmProtected
    } else if e.contains("unsupported url") {
        BlockingReason::UnsupportedUrl
    } else if e.contains("private video") {
        BlockingReason::PrivateVideo
    } else if e.contains("sign in to confirm your age") || e.contains("age-restricted") {
        BlockingReason::AgeRestricted
    } else if e.contains("not a bot") || e.contains("captcha") {
        BlockingReason::BotDetection
    } else if e.contains("not available in your country")
        || e.contains("geo restrict")
        || e.contains("geo-restrict")
    {
        BlockingReason::GeoBlocked
    } else if e.contains("429") || e.contains("too many requests") {
        BlockingReason::RateLimited
    } else if e.contains("403") || e.contains("forbidden") {
        BlockingReason::Http403Forbidden
    } else if e.contains("timed out") || e.contains("timeout") {
        BlockingReason::NetworkTimeout
    } else if e.contains("video unavailable") || e.contains("has been removed") {
        BlockingReason::VideoUnavailable
    } else {
        BlockingReason::Unknown
    };
    Some(reason)
}
