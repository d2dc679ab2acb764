//! Batch run driver
//!
//! Loads the URL list, runs each URL through the retry controller in file
//! order, pauses between URLs, and tallies the results. A failed URL never
//! stops the run.

use crate::config::Config;
use crate::downloader::{Downloader, FetchOptions};
use crate::retry::{Sleeper, download_with_retry};
use crate::urls::load_urls;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Final state of one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlResult {
    /// The URL as read from the list
    pub url: String,
    /// Downloader invocations spent on it
    pub attempts: u32,
    /// Whether it ended up downloaded
    pub succeeded: bool,
}

/// Tally of a whole run
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// URLs processed
    pub total: usize,
    /// URLs downloaded
    pub successful: usize,
    /// URLs that failed every attempt
    pub failed: usize,
    /// Absolute path of the download directory
    pub download_dir: PathBuf,
    /// Per-URL results in processing order
    pub results: Vec<UrlResult>,
}

impl RunReport {
    fn new(download_dir: PathBuf) -> Self {
        Self {
            total: 0,
            successful: 0,
            failed: 0,
            download_dir,
            results: Vec::new(),
        }
    }

    fn record(&mut self, result: UrlResult) {
        self.total += 1;
        if result.succeeded {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// URLs that failed, in processing order
    pub fn failed_urls(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| !r.succeeded)
            .map(|r| r.url.as_str())
    }
}

/// Drives a batch run over the configured URL list
pub struct BatchDownloader {
    config: Config,
    downloader: Arc<dyn Downloader>,
    sleeper: Arc<dyn Sleeper>,
}

impl BatchDownloader {
    /// Create a run driver
    pub fn new(config: Config, downloader: Arc<dyn Downloader>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            config,
            downloader,
            sleeper,
        }
    }

    /// The configuration this run uses
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process every URL in the list and report the tally
    ///
    /// A missing or unreadable list is logged and treated as an empty one.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::new(absolute_download_dir(&self.config));

        let urls = match load_urls(&self.config.urls_file).await {
            Ok(urls) => {
                info!(
                    count = urls.len(),
                    file = %self.config.urls_file.display(),
                    "Loaded {} URLs from {}",
                    urls.len(),
                    self.config.urls_file.display()
                );
                urls
            }
            Err(e) if e.is_missing_url_file() => {
                error!(
                    file = %self.config.urls_file.display(),
                    "URL file {} not found",
                    self.config.urls_file.display()
                );
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to read URL file");
                Vec::new()
            }
        };

        if urls.is_empty() {
            error!("No URLs found to process");
            return report;
        }

        info!(count = urls.len(), "Starting download of {} playlists", urls.len());

        let options = FetchOptions {
            output_dir: self.config.download_dir.clone(),
            timeout: Some(self.config.download_timeout),
        };
        let total = urls.len();

        for (index, url) in urls.into_iter().enumerate() {
            let position = index + 1;
            info!(position, total, "Processing playlist {}/{}", position, total);
            info!(url = %url, "URL: {}", url);

            let retry = download_with_retry(
                self.downloader.as_ref(),
                self.sleeper.as_ref(),
                &self.config.retry,
                &url,
                &options,
            )
            .await;

            report.record(UrlResult {
                url,
                attempts: retry.attempts,
                succeeded: retry.succeeded,
            });

            if position < total {
                info!(
                    pause_secs = self.config.item_pause.as_secs(),
                    "Pausing {}s before the next playlist",
                    self.config.item_pause.as_secs()
                );
                self.sleeper.sleep(self.config.item_pause).await;
            }
        }

        log_report(&report);
        report
    }
}

fn absolute_download_dir(config: &Config) -> PathBuf {
    std::path::absolute(&config.download_dir).unwrap_or_else(|_| config.download_dir.clone())
}

fn log_report(report: &RunReport) {
    info!("FINAL REPORT:");
    info!(successful = report.successful, "Successful: {}", report.successful);
    info!(failed = report.failed, "Failed: {}", report.failed);
    for url in report.failed_urls() {
        info!(url, "Failed URL: {}", url);
    }
    info!(
        download_dir = %report.download_dir.display(),
        "Downloads saved to: {}",
        report.download_dir.display()
    );
}
