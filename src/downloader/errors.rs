// Error types for the extraction layer

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DownloadError {
    /// Network timeout while talking to the video site
    #[error("Network timeout: the video site is not responding")]
    NetworkTimeout,

    /// The site refused the request (429, bot check, 403)
    #[error("The video site refused the request: {0}")]
    Blocked(String),

    /// yt-dlp or python not found in system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// URL rejected by the extractor
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse yt-dlp output
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Command execution failed
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// Unknown error with details
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Classify raw stderr from yt-dlp
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("timeout") || lower.contains("timed out") {
            return Self::NetworkTimeout;
        }

        if lower.contains("429")
            || lower.contains("403")
            || lower.contains("not a bot")
            || lower.contains("blocked")
        {
            return Self::Blocked(s);
        }

        if lower.contains("unsupported url") || lower.contains("is not a valid url") {
            return Self::InvalidUrl(s);
        }

        if lower.contains("no such file") || lower.contains("command not found") {
            return Self::ToolNotFound(s);
        }

        if lower.contains("json") {
            return Self::ParseError(s);
        }

        Self::Unknown(s)
    }
}

impl From<&str> for DownloadError {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_timeouts() {
        let err = DownloadError::from("ERROR: Read timed out. (read timeout=30)");
        assert_eq!(err, DownloadError::NetworkTimeout);
    }

    #[test]
    fn classifies_rate_limits_as_blocked() {
        let err = DownloadError::from("ERROR: HTTP Error 429: Too Many Requests");
        assert!(matches!(err, DownloadError::Blocked(_)));
    }

    #[test]
    fn classifies_unsupported_urls() {
        let err = DownloadError::from("ERROR: Unsupported URL: https://example.com/");
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }

    #[test]
    fn falls_back_to_unknown() {
        let err = DownloadError::from("something odd happened");
        assert_eq!(err, DownloadError::Unknown("something odd happened".into()));
        assert_eq!(err.to_string(), "Unknown error: something odd happened");
    }
}
