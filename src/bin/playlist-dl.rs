//! Batch playlist downloader with retries, logging and a final report

use clap::Parser;
use playlist_dl::{
    BatchDownloader, Config, Error, RetryConfig, RunEnd, RunLogger, RunReport, TokioSleeper,
    YtDlp, run_until, wait_for_signal,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Download every playlist listed in a text file with yt-dlp
#[derive(Debug, Parser)]
#[command(name = "playlist-dl", version, about)]
struct Cli {
    /// File with playlist URLs, one per line
    #[arg(default_value = "playlists.txt")]
    urls_file: PathBuf,

    /// Download directory
    #[arg(short = 'd', long, default_value = "downloads")]
    download_dir: PathBuf,

    /// Maximum attempts per playlist
    #[arg(
        short = 'r',
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_retries: u32,

    /// Seconds to wait between attempts
    #[arg(short = 't', long, default_value_t = 30)]
    retry_delay: u64,

    /// Also write the final report as JSON to this file
    #[arg(long, value_name = "FILE")]
    summary_json: Option<PathBuf>,
}

impl Cli {
    fn to_config(&self) -> Config {
        Config {
            urls_file: self.urls_file.clone(),
            download_dir: self.download_dir.clone(),
            retry: RetryConfig {
                max_attempts: self.max_retries,
                delay: Duration::from_secs(self.retry_delay),
            },
            ..Config::default()
        }
    }
}

async fn locate_ytdlp() -> playlist_dl::Result<(YtDlp, String)> {
    let ytdlp = YtDlp::from_path()
        .ok_or_else(|| Error::ToolNotFound(format!("{} is not in PATH", YtDlp::BINARY_NAME)))?;
    let version = ytdlp.version().await?;
    Ok((ytdlp, version))
}

fn write_summary(path: &Path, report: &RunReport) -> playlist_dl::Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.to_config();
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let (ytdlp, version) = match locate_ytdlp().await {
        Ok(found) => found,
        Err(e) => {
            eprintln!("yt-dlp not found! Install it with: pip install yt-dlp");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = config.ensure_download_dir() {
        eprintln!(
            "Cannot create download directory {}: {}",
            config.download_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let logger = match RunLogger::open(&config.log_dir) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        version = %version,
        binary = %ytdlp.binary_path().display(),
        log_file = %logger.path().display(),
        "Using yt-dlp {}",
        version
    );

    let runner = BatchDownloader::new(config, Arc::new(ytdlp), Arc::new(TokioSleeper));

    match run_until(runner.run(), wait_for_signal()).await {
        RunEnd::Finished(report) => {
            if let Some(path) = &cli.summary_json {
                match write_summary(path, &report) {
                    Ok(()) => tracing::info!(path = %path.display(), "Summary written"),
                    Err(e) => tracing::error!(error = %e, path = %path.display(), "Failed to write summary"),
                }
            }
        }
        RunEnd::Interrupted(signal) => {
            tracing::warn!(%signal, "Download interrupted by user ({})", signal);
        }
    }

    logger.close();
    ExitCode::SUCCESS
}
