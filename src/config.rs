//! Configuration types for playlist-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Retry behavior for a single URL
///
/// The delay between attempts is constant; there is no backoff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of download attempts per URL, including the first (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait between a failed attempt and the next one (default: 30 seconds)
    #[serde(default = "default_retry_delay", with = "duration_serde")]
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: default_retry_delay(),
        }
    }
}

/// Run configuration, fixed for the lifetime of a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Text file with one URL per line (default: "playlists.txt")
    #[serde(default = "default_urls_file")]
    pub urls_file: PathBuf,

    /// Directory handed to the download tool (default: "downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Directory for per-run log files (default: "logs")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Retry policy per URL
    #[serde(default)]
    pub retry: RetryConfig,

    /// Pause between two consecutive URLs (default: 5 seconds)
    #[serde(default = "default_item_pause", with = "duration_serde")]
    pub item_pause: Duration,

    /// Wall-clock limit for one invocation of the download tool (default: 1 hour)
    #[serde(default = "default_download_timeout", with = "duration_serde")]
    pub download_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls_file: default_urls_file(),
            download_dir: default_download_dir(),
            log_dir: default_log_dir(),
            retry: RetryConfig::default(),
            item_pause: default_item_pause(),
            download_timeout: default_download_timeout(),
        }
    }
}

impl Config {
    /// Check invariants that the rest of the crate relies on
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(Error::Config {
                message: "max_retries must be at least 1".to_string(),
                key: Some("max_retries".to_string()),
            });
        }
        if self.download_timeout.is_zero() {
            return Err(Error::Config {
                message: "download timeout must be greater than zero".to_string(),
                key: Some("download_timeout".to_string()),
            });
        }
        Ok(())
    }

    /// Create the download directory (and parents) if missing
    pub fn ensure_download_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.download_dir)?;
        Ok(())
    }
}

fn default_urls_file() -> PathBuf {
    PathBuf::from("playlists.txt")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_item_pause() -> Duration {
    Duration::from_secs(5)
}

fn default_download_timeout() -> Duration {
    Duration::from_secs(3600)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
