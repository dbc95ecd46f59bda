// Helper functions for extractor implementations

use std::net::{SocketAddr, TcpStream};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration as TokioDuration};

use super::errors::DownloadError;
use super::models::{CookieSource, NetworkConfig};
use super::traits::ProgressReporter;

/// Run command with timeout (shared utility)
pub async fn run_output_with_timeout(
    program: &str,
    args: Vec<String>,
    timeout_secs: u64,
) -> Result<std::process::Output, String> {
    let mut child = TokioCommand::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program, e))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| format!("Failed to capture stdout from {}", program))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| format!("Failed to capture stderr from {}", program))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stderr: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });

    let waited = timeout(TokioDuration::from_secs(timeout_secs), child.wait()).await;
    match waited {
        Ok(status_res) => {
            let status = status_res.map_err(|e| format!("Failed to wait for {}: {}", program, e))?;
            let stdout = stdout_task
                .await
                .map_err(|e| format!("stdout task failed: {}", e))??;
            let stderr = stderr_task
                .await
                .map_err(|e| format!("stderr task failed: {}", e))??;
            Ok(std::process::Output { status, stdout, stderr })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(format!("Timed out after {}s", timeout_secs))
        }
    }
}

/// Run a download command, streaming stdout through the progress reporter.
///
/// Succeeds on exit status 0; otherwise the collected stderr is classified
/// into a `DownloadError`.
pub async fn run_with_progress(
    program: &str,
    args: &[String],
    progress: &ProgressReporter,
) -> Result<(), DownloadError> {
    tracing::debug!(program, args = %args.join(" "), "spawning");

    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DownloadError::ToolNotFound(program.to_string()),
            _ => DownloadError::ExecutionError(format!("Failed to start {}: {}", program, e)),
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| DownloadError::ExecutionError("Failed to capture stdout".into()))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| DownloadError::ExecutionError("Failed to capture stderr".into()))?;

    let stderr_task = tokio::spawn(async move {
        let mut buf = String::new();
        let _ = stderr.read_to_string(&mut buf).await;
        buf
    });

    let mut lines = BufReader::new(stdout).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to read stdout: {}", e)))?
    {
        if progress.line(&line).is_none() {
            tracing::trace!("[yt-dlp] {}", line);
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Process error: {}", e)))?;
    let stderr_output = stderr_task.await.unwrap_or_default();

    if status.success() {
        return Ok(());
    }

    let message = stderr_output
        .lines()
        .filter(|l| l.starts_with("ERROR"))
        .collect::<Vec<_>>()
        .join("\n");
    let message = if message.is_empty() {
        format!("{} exited with {}: {}", program, status, stderr_output.trim())
    } else {
        message
    };
    Err(DownloadError::from(message))
}

/// Auto-detect a local SOCKS5 proxy by probing common ports
pub fn auto_detect_proxy() -> Option<String> {
    let common_ports = [
        1080,  // Standard SOCKS5
        7890,  // Clash
        10808, // V2RayN
        1081,  // Alternative
        7891,  // Alternative Clash
    ];

    for port in common_ports {
        if test_socks5_port(port) {
            tracing::info!(port, "found local SOCKS5 proxy");
            return Some(format!("socks5h://127.0.0.1:{}", port));
        }
    }

    tracing::debug!("no SOCKS5 proxy detected");
    None
}

/// Test if something listens on a local port
fn test_socks5_port(port: u16) -> bool {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpStream::connect_timeout(&addr, Duration::from_millis(200)).is_ok()
}

/// Build proxy arguments for yt-dlp
pub fn get_proxy_args(config: &NetworkConfig) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(proxy) = &config.proxy {
        args.push("--proxy".to_string());
        args.push(proxy.clone());
    }

    args
}

/// Build timeout arguments for yt-dlp
pub fn get_timeout_args(config: &NetworkConfig) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(timeout) = config.timeout {
        args.push("--socket-timeout".to_string());
        args.push(timeout.to_string());
    }

    args
}

/// Build cookie arguments for yt-dlp
pub fn get_cookie_args(cookies: &CookieSource) -> Vec<String> {
    match cookies {
        CookieSource::None => Vec::new(),
        CookieSource::File(path) => {
            vec!["--cookies".to_string(), path.to_string_lossy().into_owned()]
        }
        CookieSource::Browser(browser) => {
            vec!["--cookies-from-browser".to_string(), browser.clone()]
        }
    }
}

/// Whether a URL points at YouTube
pub fn is_youtube(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("youtube.com") || lower.contains("youtu.be")
}
