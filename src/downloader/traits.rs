//! Traits and types for download backends

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Per-invocation options handed to a [`Downloader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Root directory the backend writes media into
    pub output_dir: PathBuf,
    /// Wall-clock limit for a single invocation (None = unlimited)
    pub timeout: Option<Duration>,
}

/// Result of one download attempt
///
/// Every way an attempt can end is a value here, so the retry controller can
/// react without unwinding through `Result`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The backend finished with exit code zero
    Success,
    /// The backend ran and reported failure
    Failed {
        /// Process exit code (None when killed by a signal)
        exit_code: Option<i32>,
        /// Captured standard error, trimmed
        stderr: String,
    },
    /// The invocation exceeded its time limit and was killed
    TimedOut {
        /// The limit that was exceeded
        after: Duration,
    },
    /// The backend could not be started or waited on
    LaunchFailed {
        /// Description of the underlying failure
        message: String,
    },
}

impl FetchOutcome {
    /// Whether the attempt succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success)
    }

    /// One-line description of why the attempt failed (None on success)
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchOutcome::Success => None,
            FetchOutcome::Failed { exit_code, stderr } => {
                let status = match exit_code {
                    Some(code) => format!("exited with code {code}"),
                    None => "terminated by a signal".to_string(),
                };
                Some(if stderr.is_empty() {
                    status
                } else {
                    format!("{status}: {stderr}")
                })
            }
            FetchOutcome::TimedOut { after } => {
                Some(format!("timed out after {}s", after.as_secs()))
            }
            FetchOutcome::LaunchFailed { message } => Some(message.clone()),
        }
    }
}

/// A capability that downloads one URL per call
///
/// The production implementation drives the external `yt-dlp` binary
/// ([`YtDlp`](super::YtDlp)); tests substitute scripted fakes.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download everything behind `url`
    async fn fetch(&self, url: &str, options: &FetchOptions) -> FetchOutcome;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_success_is_success() {
        assert!(FetchOutcome::Success.is_success());
        assert!(
            !FetchOutcome::Failed {
                exit_code: Some(1),
                stderr: String::new(),
            }
            .is_success()
        );
        assert!(
            !FetchOutcome::TimedOut {
                after: Duration::from_secs(1),
            }
            .is_success()
        );
        assert!(
            !FetchOutcome::LaunchFailed {
                message: "missing".into(),
            }
            .is_success()
        );
    }

    #[test]
    fn test_failure_reason_names_the_cause() {
        assert_eq!(FetchOutcome::Success.failure_reason(), None);
        assert_eq!(
            FetchOutcome::Failed {
                exit_code: Some(2),
                stderr: "ERROR: Unsupported URL".into(),
            }
            .failure_reason()
            .as_deref(),
            Some("exited with code 2: ERROR: Unsupported URL")
        );
        assert_eq!(
            FetchOutcome::Failed {
                exit_code: None,
                stderr: String::new(),
            }
            .failure_reason()
            .as_deref(),
            Some("terminated by a signal")
        );
        assert_eq!(
            FetchOutcome::TimedOut {
                after: Duration::from_secs(3600),
            }
            .failure_reason()
            .as_deref(),
            Some("timed out after 3600s")
        );
        assert_eq!(
            FetchOutcome::LaunchFailed {
                message: "Failed to execute yt-dlp: not found".into(),
            }
            .failure_reason()
            .as_deref(),
            Some("Failed to execute yt-dlp: not found")
        );
    }
}
