//! Video metadata as written by yt-dlp's `--write-info-json`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use time::macros::format_description;
use time::Date;

use crate::error::{Error, Result};

/// The subset of the info json this tool reads; other keys are ignored
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    /// `YYYYMMDD`
    pub upload_date: Option<String>,
    pub description: Option<String>,
    pub webpage_url: Option<String>,
    pub original_url: Option<String>,
    /// Remote thumbnail URL
    pub thumbnail: Option<String>,
    pub ext: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tags: Option<Vec<String>>,
}

impl VideoMetadata {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        serde_json::from_str(&text).map_err(|source| Error::Metadata {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn title(&self) -> &str {
        non_empty(&self.title).unwrap_or("Untitled Video")
    }

    pub fn uploader(&self) -> &str {
        non_empty(&self.uploader)
            .or_else(|| non_empty(&self.channel))
            .unwrap_or("Unknown")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Page on the original site; `fallback` is usually the requested URL
    pub fn webpage_url<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(&self.webpage_url)
            .or_else(|| non_empty(&self.original_url))
            .unwrap_or(fallback)
    }

    /// Upload date as `YYYY-MM-DD`, or the raw value when it does not parse
    pub fn upload_date(&self) -> String {
        format_date(self.upload_date.as_deref().unwrap_or(""))
    }

    /// Upload date only when it parses
    pub fn upload_date_iso(&self) -> Option<String> {
        self.upload_date.as_deref().and_then(parse_date).map(iso_date)
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    /// Whole seconds, when yt-dlp knows the length
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(date_str: &str) -> Option<Date> {
    Date::parse(date_str, format_description!("[year][month][day]")).ok()
}

pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Format date from YYYYMMDD to ISO format (YYYY-MM-DD).
///
/// Anything that is not a valid date comes back unchanged.
pub fn format_date(date_str: &str) -> String {
    match parse_date(date_str) {
        Some(date) => iso_date(date),
        None => date_str.to_string(),
    }
}

/// `H:MM:SS` for an hour or more, else `M:SS`
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
