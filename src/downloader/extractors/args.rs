// yt-dlp argument construction shared by the CLI and Python extractors

use crate::downloader::models::DownloadRequest;
use crate::downloader::utils::{get_cookie_args, get_proxy_args, get_timeout_args, is_youtube};

/// Output template inside the work directory; the id keeps names predictable
pub const OUTPUT_TEMPLATE: &str = "%(id)s.%(ext)s";

/// Build the yt-dlp arguments (without the program itself) for a download
pub fn build_download_args(request: &DownloadRequest) -> Vec<String> {
    let mut args = vec![
        "-f".to_string(),
        request.format_spec.clone(),
        "--no-playlist".to_string(),
        "--newline".to_string(),
        "--no-update".to_string(),
    ];
    args.extend(get_timeout_args(&request.network));
    args.extend([
        "--retries".to_string(),
        "5".to_string(),
        "--fragment-retries".to_string(),
        "10".to_string(),
        "-P".to_string(),
        request.work_dir.to_string_lossy().into_owned(),
        "-o".to_string(),
        OUTPUT_TEMPLATE.to_string(),
        "--write-info-json".to_string(),
        "--write-thumbnail".to_string(),
    ]);

    if let Some(container) = &request.merge_format {
        args.push("--merge-output-format".to_string());
        args.push(container.clone());
    }

    if let Some(client) = &request.player_client {
        if is_youtube(&request.url) {
            args.push("--extractor-args".to_string());
            args.push(format!("youtube:player_client={}", client));
        }
    }

    args.extend(get_cookie_args(&request.cookies));
    args.extend(get_proxy_args(&request.network));

    // end of options, so a URL can never be read as a flag
    args.push("--".to_string());
    args.push(request.url.clone());
    args
}
