//! Download backends
//!
//! The core abstraction is the [`Downloader`] trait: one call downloads one
//! URL and reports a [`FetchOutcome`]. [`YtDlp`] implements it by running the
//! external `yt-dlp` binary; the retry controller and the run drivers only see
//! the trait, so tests swap in scripted fakes.

mod traits;
mod ytdlp;

pub use traits::{Downloader, FetchOptions, FetchOutcome};
pub use ytdlp::{ArgProfile, FORMAT_SELECTOR, TOOL_RETRIES, YtDlp, output_template};
