use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use sumvideo::config::{FileConfig, Overrides, CONFIG_ENV};
use sumvideo::downloader::ExtractorMode;
use sumvideo::{logging, Config, Error};

#[derive(Parser, Debug)]
#[command(name = "sumvideo", version, about = "Download a video and build a shareable HTML page for it")]
struct Args {
    /// Video page URL
    #[arg(required_unless_present = "check_tools")]
    url: Option<String>,

    /// Directory for the video and page
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Container format (mp4, webm, mkv, ...)
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<String>,

    /// Maximum quality: best, 1080p, 720p, 480p, 360p
    #[arg(short, long, value_name = "QUALITY")]
    quality: Option<String>,

    /// Embed the video in the page instead of keeping a separate file
    #[arg(long)]
    standalone: bool,

    /// Keep yt-dlp's work directory
    #[arg(long)]
    keep_temp: bool,

    /// Which yt-dlp to run: auto, cli or python
    #[arg(long, value_name = "MODE")]
    extractor: Option<ExtractorMode>,

    /// Path to the yt-dlp executable
    #[arg(long = "ytdlp", value_name = "PATH")]
    ytdlp_path: Option<String>,

    /// Proxy URL, or `auto` to probe local SOCKS5 ports
    #[arg(long, value_name = "URL|auto")]
    proxy: Option<String>,

    /// Netscape cookies file
    #[arg(long, value_name = "FILE", conflicts_with = "cookies_from_browser")]
    cookies: Option<PathBuf>,

    /// Read cookies from a browser profile
    #[arg(long, value_name = "BROWSER")]
    cookies_from_browser: Option<String>,

    /// Public URL the output directory is served from
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Never fetch the thumbnail over HTTP
    #[arg(long)]
    no_thumbnail_fetch: bool,

    /// Replace existing files instead of numbering new ones
    #[arg(long)]
    overwrite: bool,

    /// Config file
    #[arg(long, value_name = "FILE", env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// List the external tools and exit
    #[arg(long)]
    check_tools: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            format: self.format.clone(),
            quality: self.quality.clone(),
            standalone: self.standalone,
            keep_temp: self.keep_temp,
            extractor: self.extractor,
            ytdlp_path: self.ytdlp_path.clone(),
            proxy: self.proxy.clone(),
            cookies: self.cookies.clone(),
            cookies_from_browser: self.cookies_from_browser.clone(),
            base_url: self.base_url.clone(),
            no_thumbnail_fetch: self.no_thumbnail_fetch,
            overwrite: self.overwrite,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Printed directly so RUST_LOG cannot hide it
            eprintln!("{}", failure_report(&e));
            ExitCode::FAILURE
        }
    }
}

/// `error: <chain>`, plus a `hint:` line for download failures
fn failure_report(e: &anyhow::Error) -> String {
    let mut report = format!("error: {:#}", e);
    let hint = e.downcast_ref::<Error>().and_then(|err| match err {
        Error::Download(failure) => failure.suggestion(),
        _ => None,
    });
    if let Some(hint) = hint {
        report.push_str("\nhint: ");
        report.push_str(&hint);
    }
    report
}

async fn run(args: Args) -> anyhow::Result<()> {
    let file = match args.config.clone().or_else(FileConfig::default_path) {
        Some(path) => FileConfig::load(&path)?,
        None => FileConfig::default(),
    };
    let config = Config::resolve(args.overrides(), file)?;

    if args.check_tools {
        for tool in sumvideo::check_tools(&config).await {
            println!("{}", tool);
        }
        return Ok(());
    }

    let url = args.url.context("a video URL is required")?;
    let outcome = sumvideo::run(&url, config).await?;

    if let Some(video) = &outcome.video_path {
        println!("{}", video.display());
    }
    println!("{}", outcome.html_path.display());
    if let Some(work_dir) = &outcome.work_dir {
        tracing::info!(path = %work_dir.display(), "temporary files kept");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "sumvideo",
            "https://example.com/v",
            "-o",
            "/tmp/out",
            "-f",
            "webm",
            "--standalone",
            "--extractor",
            "python",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.url.as_deref(), Some("https://example.com/v"));
        assert_eq!(args.verbose, 2);
        let o = args.overrides();
        assert_eq!(o.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(o.format.as_deref(), Some("webm"));
        assert!(o.standalone);
        assert_eq!(o.extractor, Some(ExtractorMode::Python));
    }

    #[test]
    fn failure_report_names_each_cause_once() {
        use sumvideo::downloader::{DownloadError, DownloadFailure};

        let failure = DownloadFailure {
            error: DownloadError::ToolNotFound("yt-dlp".into()),
            blocking_reason: None,
            used: None,
            tried_fallback: false,
        };
        let report = failure_report(&anyhow::Error::from(Error::from(failure)));

        assert!(report.starts_with("error: download failed: Tool not found: yt-dlp"));
        assert_eq!(report.matches("Tool not found").count(), 1);
        assert_eq!(report.matches("pip install yt-dlp").count(), 1);
        assert!(report.contains("\nhint: Install yt-dlp"));
    }

    #[test]
    fn failure_report_for_plain_errors() {
        let report = failure_report(&anyhow::anyhow!("a video URL is required"));
        assert_eq!(report, "error: a video URL is required");
    }

    #[test]
    fn url_required_unless_checking_tools() {
        assert!(Args::try_parse_from(["sumvideo"]).is_err());
        assert!(Args::try_parse_from(["sumvideo", "--check-tools"]).is_ok());
        assert!(Args::try_parse_from(["sumvideo", "u", "--cookies", "c.txt", "--cookies-from-browser", "firefox"]).is_err());
    }
}
