//! # playlist-dl
//!
//! Batch downloader for media playlists. Reads a list of URLs from a text
//! file and hands each one to the external `yt-dlp` tool, retrying failed
//! downloads with a fixed delay and reporting a success/failure tally.
//!
//! Two binaries are built from this crate:
//! - `playlist-dl` - retries, per-run log file, final report
//! - `playlist-dl-simple` - one attempt per URL, console output only
//!
//! ## Quick Start
//!
//! ```no_run
//! use playlist_dl::{BatchDownloader, Config, TokioSleeper, YtDlp};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ytdlp = YtDlp::from_path().ok_or("yt-dlp not found")?;
//!     let config = Config::default();
//!     config.ensure_download_dir()?;
//!
//!     let runner = BatchDownloader::new(config, Arc::new(ytdlp), Arc::new(TokioSleeper));
//!     let report = runner.run().await;
//!     println!("{} ok, {} failed", report.successful, report.failed);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Download backends (yt-dlp)
pub mod downloader;
/// Error types
pub mod error;
/// Per-run log sink
pub mod logging;
/// Batch run driver
pub mod orchestrator;
/// Retry state machine with a fixed delay
pub mod retry;
/// Single-attempt runner
pub mod simple;
/// URL list loading
pub mod urls;

// Re-export commonly used types
pub use config::{Config, RetryConfig};
pub use downloader::{ArgProfile, Downloader, FetchOptions, FetchOutcome, YtDlp};
pub use error::{Error, Result};
pub use logging::RunLogger;
pub use orchestrator::{BatchDownloader, RunReport, UrlResult};
pub use retry::{RetryReport, RetryState, Sleeper, TokioSleeper, download_with_retry};
pub use simple::{SimpleFailure, SimpleRunOutcome, run_simple};
pub use urls::{load_urls, parse_urls};

/// Signal that ended a run early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl std::fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownSignal::Interrupt => f.write_str("SIGINT"),
            ShutdownSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// How [`run_until`] finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEnd<T, S> {
    /// The run completed with this value
    Finished(T),
    /// Shutdown was requested first; the run was dropped
    Interrupted(S),
}

/// Drive `run` until it completes or `shutdown` resolves
///
/// Shutdown is checked first on every poll, so a Ctrl+C that also kills the
/// running `yt-dlp` is reported as an interruption even if the run could
/// finish in the same wakeup. Dropping the run kills any child still in
/// flight and cancels pending sleeps.
pub async fn run_until<F, S>(run: F, shutdown: S) -> RunEnd<F::Output, S::Output>
where
    F: std::future::Future,
    S: std::future::Future,
{
    tokio::select! {
        biased;
        signal = shutdown => RunEnd::Interrupted(signal),
        output = run => RunEnd::Finished(output),
    }
}

/// Wait for SIGINT or SIGTERM and report which one arrived
///
/// Falls back to `tokio::signal::ctrl_c()` when neither handler can be
/// registered (restricted containers).
#[cfg(unix)]
pub async fn wait_for_signal() -> ShutdownSignal {
    use tokio::signal::unix::{SignalKind, signal};

    match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(mut sigint), Ok(mut sigterm)) => tokio::select! {
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigterm.recv() => ShutdownSignal::Terminate,
        },
        (Ok(mut sigint), Err(e)) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for SIGINT only");
            sigint.recv().await;
            ShutdownSignal::Interrupt
        }
        (Err(e), Ok(mut sigterm)) => {
            tracing::warn!(error = %e, "SIGINT handler unavailable, listening for SIGTERM only");
            sigterm.recv().await;
            ShutdownSignal::Terminate
        }
        (Err(e), Err(_)) => {
            tracing::warn!(error = %e, "No signal handlers available, falling back to ctrl_c");
            wait_for_ctrl_c().await
        }
    }
}

/// Wait for Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_signal() -> ShutdownSignal {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() -> ShutdownSignal {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a listener the run can only end on its own.
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    ShutdownSignal::Interrupt
}
