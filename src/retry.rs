//! Retry logic with a fixed delay
//!
//! A URL is attempted up to [`RetryConfig::max_attempts`] times. The first
//! success ends the loop; after every failure except the last the controller
//! waits [`RetryConfig::delay`] (constant, no backoff) before trying again.
//!
//! The policy itself is the pure transition function on [`RetryState`], so it
//! can be tested without a downloader or a clock. [`download_with_retry`]
//! drives that state machine with an injected [`Downloader`] and [`Sleeper`].
//!
//! # Example
//!
//! ```no_run
//! use playlist_dl::config::RetryConfig;
//! use playlist_dl::downloader::{FetchOptions, YtDlp};
//! use playlist_dl::retry::{TokioSleeper, download_with_retry};
//!
//! # async fn example() {
//! let ytdlp = YtDlp::from_path().expect("yt-dlp not found");
//! let options = FetchOptions { output_dir: "downloads".into(), timeout: None };
//! let report = download_with_retry(
//!     &ytdlp,
//!     &TokioSleeper,
//!     &RetryConfig::default(),
//!     "https://example.com/playlist",
//!     &options,
//! )
//! .await;
//! println!("succeeded={} after {} attempts", report.succeeded, report.attempts);
//! # }
//! ```

use crate::config::RetryConfig;
use crate::downloader::{Downloader, FetchOptions, FetchOutcome};
use async_trait::async_trait;
use std::time::Duration;

/// Async sleep capability, injected so tests can skip real waits
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// State of the per-URL retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// About to invoke the downloader (1-based attempt number)
    Attempting {
        /// Attempt about to run
        attempt: u32,
    },
    /// Waiting out the retry delay after a failed attempt
    Waiting {
        /// Attempt that just failed
        failed_attempt: u32,
    },
    /// Download succeeded
    Succeeded {
        /// Attempts used, including the successful one
        attempts: u32,
    },
    /// Every attempt failed
    FailedPermanently {
        /// Attempts used
        attempts: u32,
    },
}

impl RetryState {
    /// Initial state of the loop
    pub fn start() -> Self {
        RetryState::Attempting { attempt: 1 }
    }

    /// Next state after `attempt` finished
    pub fn after_outcome(attempt: u32, max_attempts: u32, succeeded: bool) -> Self {
        if succeeded {
            RetryState::Succeeded { attempts: attempt }
        } else if attempt < max_attempts {
            RetryState::Waiting {
                failed_attempt: attempt,
            }
        } else {
            RetryState::FailedPermanently { attempts: attempt }
        }
    }

    /// Next state once the retry delay has elapsed
    ///
    /// Only `Waiting` moves; every other state is returned unchanged.
    pub fn after_wait(self) -> Self {
        match self {
            RetryState::Waiting { failed_attempt } => RetryState::Attempting {
                attempt: failed_attempt + 1,
            },
            other => other,
        }
    }

    /// Whether the loop has finished
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RetryState::Succeeded { .. } | RetryState::FailedPermanently { .. }
        )
    }
}

/// Result of the retry loop for one URL
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    /// Number of downloader invocations
    pub attempts: u32,
    /// Whether one of them succeeded
    pub succeeded: bool,
    /// Outcome of the final invocation
    pub last_outcome: FetchOutcome,
}

/// Download `url`, retrying with a fixed delay until success or exhaustion
///
/// A `max_attempts` of zero is treated as one attempt.
pub async fn download_with_retry(
    downloader: &dyn Downloader,
    sleeper: &dyn Sleeper,
    config: &RetryConfig,
    url: &str,
    options: &FetchOptions,
) -> RetryReport {
    let max_attempts = config.max_attempts.max(1);
    let mut state = RetryState::start();
    let mut last_outcome = FetchOutcome::LaunchFailed {
        message: "no attempt made".to_string(),
    };

    loop {
        match state {
            RetryState::Attempting { attempt } => {
                tracing::info!(
                    url,
                    attempt,
                    max_attempts,
                    backend = downloader.name(),
                    "Starting download (attempt {}/{})",
                    attempt,
                    max_attempts
                );

                let outcome = downloader.fetch(url, options).await;
                log_outcome(url, attempt, &outcome);
                state = RetryState::after_outcome(attempt, max_attempts, outcome.is_success());
                last_outcome = outcome;
            }
            RetryState::Waiting { failed_attempt } => {
                tracing::warn!(
                    url,
                    attempt = failed_attempt,
                    delay_secs = config.delay.as_secs_f64(),
                    "Attempt {} failed, waiting {}s before retrying",
                    failed_attempt,
                    config.delay.as_secs()
                );
                sleeper.sleep(config.delay).await;
                state = state.after_wait();
            }
            RetryState::Succeeded { attempts } => {
                return RetryReport {
                    attempts,
                    succeeded: true,
                    last_outcome,
                };
            }
            RetryState::FailedPermanently { attempts } => {
                tracing::error!(url, attempts, "All attempts failed for {}", url);
                return RetryReport {
                    attempts,
                    succeeded: false,
                    last_outcome,
                };
            }
        }
    }
}

fn log_outcome(url: &str, attempt: u32, outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Success => {
            tracing::info!(url, attempt, "Playlist downloaded successfully: {}", url);
        }
        FetchOutcome::Failed { exit_code, stderr } => {
            tracing::error!(
                url,
                attempt,
                exit_code = ?exit_code,
                "Download failed: {}",
                stderr
            );
        }
        FetchOutcome::TimedOut { after } => {
            tracing::error!(
                url,
                attempt,
                timeout_secs = after.as_secs(),
                "Download timed out: {}",
                url
            );
        }
        FetchOutcome::LaunchFailed { message } => {
            tracing::error!(url, attempt, "Unexpected error: {}", message);
        }
    }
}
