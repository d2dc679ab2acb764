//! yt-dlp backend using the external `yt-dlp` binary

use super::traits::{Downloader, FetchOptions, FetchOutcome};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Video format selector: best single-file format no taller than 1080p
pub const FORMAT_SELECTOR: &str = "best[height<=1080]";

/// Retry count handed to yt-dlp for whole items and for fragments
pub const TOOL_RETRIES: u32 = 5;

/// Which set of yt-dlp options to pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgProfile {
    /// Full metadata, embedding, resume and retry options; output captured
    #[default]
    Full,
    /// Format and output only; the tool's own progress goes to the console
    Minimal,
}

/// Output path template below `output_dir`
pub fn output_template(output_dir: &Path) -> PathBuf {
    output_dir
        .join("%(uploader)s")
        .join("%(playlist)s")
        .join("%(title)s.%(ext)s")
}

/// Download backend that executes the external `yt-dlp` binary
///
/// # Examples
///
/// ```no_run
/// use playlist_dl::downloader::{Downloader, FetchOptions, YtDlp};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let ytdlp = YtDlp::from_path().expect("yt-dlp not found in PATH");
/// let options = FetchOptions {
///     output_dir: "downloads".into(),
///     timeout: Some(Duration::from_secs(3600)),
/// };
/// let outcome = ytdlp.fetch("https://example.com/playlist", &options).await;
/// println!("{outcome:?}");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary_path: PathBuf,
    profile: ArgProfile,
}

impl YtDlp {
    /// Executable name searched for in PATH
    pub const BINARY_NAME: &'static str = "yt-dlp";

    /// Create a backend with an explicit binary path and the full option set
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            profile: ArgProfile::Full,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// Returns `None` when the `which` crate cannot locate the binary.
    pub fn from_path() -> Option<Self> {
        which::which(Self::BINARY_NAME).ok().map(Self::new)
    }

    /// Use a different option set
    #[must_use]
    pub fn with_profile(mut self, profile: ArgProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Path of the executable this backend runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Option set this backend passes
    pub fn profile(&self) -> ArgProfile {
        self.profile
    }

    /// Run `yt-dlp --version` to confirm the binary is usable
    ///
    /// # Errors
    ///
    /// [`Error::ToolNotFound`] if the binary cannot be executed or exits non-zero.
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.binary_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                Error::ToolNotFound(format!(
                    "failed to execute {}: {}",
                    self.binary_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::ToolNotFound(format!(
                "{} --version exited with {}",
                self.binary_path.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Command-line arguments for downloading `url` into `output_dir`
    pub fn build_args(&self, url: &str, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(24);

        if self.profile == ArgProfile::Full {
            args.extend(
                [
                    "--no-flat-playlist",
                    "--write-info-json",
                    "--write-thumbnail",
                    "--embed-chapters",
                    "--embed-metadata",
                    "--embed-thumbnail",
                ]
                .map(OsString::from),
            );
        }

        args.push("--format".into());
        args.push(FORMAT_SELECTOR.into());
        args.push("--output".into());
        args.push(output_template(output_dir).into_os_string());
        args.push("--ignore-errors".into());
        args.push("--no-overwrites".into());

        if self.profile == ArgProfile::Full {
            args.push("--continue".into());
            args.push("--retries".into());
            args.push(TOOL_RETRIES.to_string().into());
            args.push("--fragment-retries".into());
            args.push(TOOL_RETRIES.to_string().into());
        }

        args.push(url.into());
        args
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> FetchOutcome {
        let mut command = Command::new(&self.binary_path);
        command
            .args(self.build_args(url, &options.output_dir))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match self.profile {
            ArgProfile::Full => command.stdout(Stdio::piped()).stderr(Stdio::piped()),
            ArgProfile::Minimal => command.stdout(Stdio::inherit()).stderr(Stdio::inherit()),
        };

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return FetchOutcome::LaunchFailed {
                    message: format!("Failed to execute {}: {}", self.binary_path.display(), e),
                };
            }
        };

        // Dropping the wait future drops the child, which kills it.
        let waited = match options.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => return FetchOutcome::TimedOut { after: limit },
            },
            None => child.wait_with_output().await,
        };

        match waited {
            Ok(output) if output.status.success() => FetchOutcome::Success,
            Ok(output) => FetchOutcome::Failed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Err(e) => FetchOutcome::LaunchFailed {
                message: format!("Failed to wait for {}: {}", self.binary_path.display(), e),
            },
        }
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
