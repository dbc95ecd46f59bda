// Extraction mode selection

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which yt-dlp flavour to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorMode {
    /// Python module yt_dlp
    Python,
    /// CLI binary yt-dlp
    Cli,
    /// CLI first, Python module as fallback
    #[default]
    Auto,
}

impl fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Cli => write!(f, "cli"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for ExtractorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "cli" => Ok(Self::Cli),
            "auto" => Ok(Self::Auto),
            other => Err(format!(
                "unknown extractor '{}' (expected auto, cli or python)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        for mode in [ExtractorMode::Python, ExtractorMode::Cli, ExtractorMode::Auto] {
            assert_eq!(mode.to_string().parse::<ExtractorMode>(), Ok(mode));
        }
        assert!("java".parse::<ExtractorMode>().is_err());
    }
}
