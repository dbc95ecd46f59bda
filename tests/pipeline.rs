// End-to-end runs against a stand-in yt-dlp script
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use sumvideo::config::{FileConfig, Overrides};
use sumvideo::downloader::{DownloadError, ExtractorMode};
use sumvideo::{Archiver, Config, Error};

const FAKE_YTDLP: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "2025.01.15"
    exit 0
fi
dir=.
url=
while [ $# -gt 0 ]; do
    case "$1" in
        -P) dir="$2"; shift 2 ;;
        --) url="$2"; shift 2 ;;
        *) shift ;;
    esac
done
case "$url" in
    *unsupported*)
        echo "ERROR: Unsupported URL: $url" >&2
        exit 1
        ;;
esac
cat > "$dir/xyz.info.json" <<JSON
{"id": "xyz", "title": "Council Meeting: Budget & Parks", "uploader": "City Hall",
 "upload_date": "20250110", "description": "Agenda\nItem 1", "webpage_url": "$url",
 "ext": "mp4", "duration": 3725}
JSON
echo "[download] Destination: $dir/xyz.mp4"
printf 'not really a video' > "$dir/xyz.mp4"
printf 'jpeg' > "$dir/xyz.jpg"
echo "[download] 100.0% of 18.00B at 1.00MiB/s ETA 00:00"
"#;

fn install_fake(dir: &Path) -> PathBuf {
    let path = dir.join("yt-dlp");
    fs::write(&path, FAKE_YTDLP).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn archiver(bin_dir: &Path, out_dir: &Path, cli: Overrides) -> Archiver {
    let cli = Overrides {
        output_dir: Some(out_dir.to_path_buf()),
        extractor: Some(ExtractorMode::Cli),
        ytdlp_path: Some(install_fake(bin_dir).to_string_lossy().into_owned()),
        no_thumbnail_fetch: true,
        ..cli
    };
    Archiver::new(Config::resolve(cli, FileConfig::default()).unwrap())
}

#[tokio::test]
async fn archives_with_fake_ytdlp() {
    let bin = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let outcome = archiver(bin.path(), out.path(), Overrides::default())
        .run("https://video.example.com/watch?v=xyz")
        .await
        .unwrap();

    let stem = "council-meeting-budget-parks-2025-01-10";
    assert_eq!(outcome.html_path, out.path().join(format!("{stem}.html")));
    assert_eq!(outcome.video_path, Some(out.path().join(format!("{stem}.mp4"))));
    assert_eq!(outcome.metadata.title(), "Council Meeting: Budget & Parks");

    let html = fs::read_to_string(&outcome.html_path).unwrap();
    assert!(html.contains("<h1>Council Meeting: Budget &amp; Parks</h1>"));
    assert!(html.contains(&format!(r#"<source src="{stem}.mp4" type="video/mp4">"#)));
    assert!(html.contains("poster=\"data:image/jpeg;base64,anBlZw==\""));
    assert!(html.contains("<strong>Duration:</strong> 1:02:05"));
    assert!(html.contains("Agenda<br>\nItem 1"));
    assert!(html.contains(r#"<meta property="og:type" content="video.other">"#));

    // Only the two results remain
    let mut names: Vec<String> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec![format!("{stem}.html"), format!("{stem}.mp4")]);
}

#[tokio::test]
async fn standalone_with_kept_work_dir() {
    let bin = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let cli = Overrides {
        standalone: true,
        keep_temp: true,
        ..Overrides::default()
    };

    let outcome = archiver(bin.path(), out.path(), cli)
        .run("https://video.example.com/watch?v=xyz")
        .await
        .unwrap();

    let html = fs::read_to_string(&outcome.html_path).unwrap();
    assert!(html.contains("src=\"data:video/mp4;base64,"));

    let work_dir = outcome.work_dir.expect("work dir kept");
    assert!(work_dir.join("xyz.info.json").exists());
    assert_eq!(outcome.video_path, Some(work_dir.join("xyz.mp4")));
    assert!(work_dir.join("xyz.mp4").exists());
}

#[tokio::test]
async fn tool_error_is_reported() {
    let bin = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let err = archiver(bin.path(), out.path(), Overrides::default())
        .run("https://unsupported.example.com/")
        .await
        .unwrap_err();

    match err {
        Error::Download(failure) => {
            assert!(matches!(failure.error, DownloadError::InvalidUrl(_)));
            assert!(failure.suggestion().is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}
