use std::fmt;

use super::extractors::find_ytdlp;
use super::utils::run_output_with_timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    YtDlp,
    PythonYtDlp,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::PythonYtDlp => "python yt_dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    /// Why the tool matters, shown next to a missing tool
    pub fn purpose(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "downloads videos (cli extractor)",
            ToolType::PythonYtDlp => "downloads videos (python extractor)",
            ToolType::Ffmpeg => "merges separate video and audio streams",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<String>,
    pub is_available: bool,
}

impl fmt::Display for ToolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_available {
            write!(
                f,
                "{:<14} ok       {} ({})",
                self.tool_type.as_str(),
                self.version.as_deref().unwrap_or("unknown version"),
                self.path.as_deref().unwrap_or("?")
            )
        } else {
            write!(
                f,
                "{:<14} missing  {}",
                self.tool_type.as_str(),
                self.tool_type.purpose()
            )
        }
    }
}

pub struct ToolManager {
    ytdlp_path: String,
    python: String,
}

impl ToolManager {
    pub fn new(ytdlp_path: Option<String>, python: String) -> Self {
        Self {
            ytdlp_path: ytdlp_path.unwrap_or_else(find_ytdlp),
            python,
        }
    }

    pub async fn get_tool_info(&self, tool_type: ToolType) -> ToolInfo {
        let (program, args) = match tool_type {
            ToolType::YtDlp => (self.ytdlp_path.clone(), vec!["--version".to_string()]),
            ToolType::PythonYtDlp => (
                self.python.clone(),
                vec!["-m".to_string(), "yt_dlp".to_string(), "--version".to_string()],
            ),
            ToolType::Ffmpeg => ("ffmpeg".to_string(), vec!["-version".to_string()]),
        };

        let version = self.get_version(&program, args).await;
        ToolInfo {
            tool_type,
            is_available: version.is_some(),
            path: version.as_ref().map(|_| program),
            version,
        }
    }

    pub async fn get_all_tools(&self) -> Vec<ToolInfo> {
        vec![
            self.get_tool_info(ToolType::YtDlp).await,
            self.get_tool_info(ToolType::PythonYtDlp).await,
            self.get_tool_info(ToolType::Ffmpeg).await,
        ]
    }

    async fn get_version(&self, program: &str, args: Vec<String>) -> Option<String> {
        match run_output_with_timeout(program, args, 20).await {
            Ok(output) if output.status.success() => {
                let out = String::from_utf8_lossy(&output.stdout);
                // ffmpeg prints a banner; the first line carries the version
                out.lines().next().map(|l| l.trim().to_string())
            }
            Ok(output) => {
                tracing::debug!(program, status = %output.status, "version probe failed");
                None
            }
            Err(e) => {
                tracing::debug!(program, error = %e, "version probe failed");
                None
            }
        }
    }
}
