// Extractors - run yt-dlp to fetch a video into a work directory
//
// Two flavours:
// - CLI mode: native `yt-dlp` binary
// - Python mode: `python3 -m yt_dlp`
//
// The Downloader orchestrator picks one, or tries both in Auto mode.

mod args;
mod cli;
mod diagnostics;
mod mode;
mod python;

pub use args::{build_download_args, OUTPUT_TEMPLATE};
pub use cli::{find_ytdlp, CliExtractor};
pub use diagnostics::{diagnose_error, BlockingReason};
pub use mode::ExtractorMode;
pub use python::PythonExtractor;
