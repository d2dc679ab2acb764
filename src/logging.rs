//! Per-run log sink
//!
//! A [`RunLogger`] mirrors every `tracing` event to stdout and to a fresh
//! timestamped file under the log directory. It is installed as the default
//! subscriber of the current thread for as long as the logger lives; dropping
//! it (or calling [`RunLogger::close`]) uninstalls it and flushes the file.
//!
//! The binaries run on a current-thread runtime, so every event of a run is
//! emitted on the thread that holds the logger.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Log file name for a run started at `started`
pub fn log_file_name(started: NaiveDateTime) -> String {
    format!("download_log_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Console + file logger scoped to one run
#[must_use = "dropping the logger uninstalls it"]
pub struct RunLogger {
    path: PathBuf,
    // Field order matters: the subscriber is uninstalled before the file is flushed.
    _default: DefaultGuard,
    _flush: WorkerGuard,
}

impl RunLogger {
    /// Open a logger using `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVES`]
    pub fn open(log_dir: &Path) -> Result<Self> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
        Self::open_with_filter(log_dir, filter)
    }

    /// Open a logger with explicit filter directives (e.g. `"debug"`)
    pub fn open_with_directives(log_dir: &Path, directives: &str) -> Result<Self> {
        let filter = EnvFilter::try_new(directives)
            .map_err(|e| Error::Logging(format!("invalid log filter {directives:?}: {e}")))?;
        Self::open_with_filter(log_dir, filter)
    }

    fn open_with_filter(log_dir: &Path, filter: EnvFilter) -> Result<Self> {
        // Colours only when a person is watching; redirected output stays plain.
        let ansi = std::io::stdout().is_terminal();
        Self::open_with_console(log_dir, filter, std::io::stdout, ansi)
    }

    fn open_with_console<W>(
        log_dir: &Path,
        filter: EnvFilter,
        console: W,
        console_ansi: bool,
    ) -> Result<Self>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            Error::Logging(format!(
                "failed to create log directory {}: {}",
                log_dir.display(),
                e
            ))
        })?;

        let path = log_dir.join(log_file_name(Local::now().naive_local()));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                Error::Logging(format!(
                    "failed to open log file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let (file_writer, flush_guard) = tracing_appender::non_blocking(file);

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(console_ansi)
                    .with_writer(console),
            )
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(file_writer),
            );

        let default_guard = tracing::subscriber::set_default(subscriber);

        Ok(Self {
            path,
            _default: default_guard,
            _flush: flush_guard,
        })
    }

    /// Path of this run's log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Uninstall the logger, flush the file and return its path
    pub fn close(self) -> PathBuf {
        let RunLogger {
            path,
            _default,
            _flush,
        } = self;
        drop(_default);
        drop(_flush);
        path
    }
}
