//! Minimal runner: one attempt per URL, console output only

use crate::downloader::{Downloader, FetchOptions};
use crate::urls::load_urls;
use std::path::Path;

/// A URL whose single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleFailure {
    /// The URL as read from the list
    pub url: String,
    /// Why the attempt failed
    pub reason: String,
}

/// How a minimal run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleRunOutcome {
    /// The URL list does not exist
    MissingFile,
    /// The URL list exists but could not be read
    Unreadable,
    /// The URL list has no URLs
    NoUrls,
    /// Every URL was attempted once
    Completed {
        /// URLs attempted
        processed: usize,
        /// URLs whose attempt succeeded
        succeeded: usize,
        /// URLs whose attempt failed, in list order
        failures: Vec<SimpleFailure>,
    },
}

/// Attempt every URL in `urls_file` once, printing progress to stdout
pub async fn run_simple(
    urls_file: &Path,
    downloader: &dyn Downloader,
    options: &FetchOptions,
) -> SimpleRunOutcome {
    let urls = match load_urls(urls_file).await {
        Ok(urls) => urls,
        Err(e) if e.is_missing_url_file() => {
            eprintln!("File {} not found!", urls_file.display());
            return SimpleRunOutcome::MissingFile;
        }
        Err(e) => {
            eprintln!("Could not read {}: {}", urls_file.display(), e);
            return SimpleRunOutcome::Unreadable;
        }
    };

    if urls.is_empty() {
        eprintln!("No URLs found!");
        return SimpleRunOutcome::NoUrls;
    }

    println!("Starting download of {} playlists...", urls.len());

    let total = urls.len();
    let mut succeeded = 0;
    let mut failures = Vec::new();
    for (index, url) in urls.into_iter().enumerate() {
        println!("\nPlaylist {}/{}: {}", index + 1, total, url);

        match downloader.fetch(&url, options).await.failure_reason() {
            None => {
                succeeded += 1;
                println!("Done!");
            }
            Some(reason) => {
                eprintln!("Download error ({reason}) - continuing...");
                failures.push(SimpleFailure { url, reason });
            }
        }
    }

    SimpleRunOutcome::Completed {
        processed: total,
        succeeded,
        failures,
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::{ArgProfile, FetchOutcome, YtDlp};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails every second call
    #[derive(Default)]
    struct AlternatingDownloader {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Downloader for AlternatingDownloader {
        async fn fetch(&self, _url: &str, _options: &FetchOptions) -> FetchOutcome {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 0 {
                FetchOutcome::Success
            } else {
                FetchOutcome::Failed {
                    exit_code: Some(1),
                    stderr: String::new(),
                }
            }
        }

        fn name(&self) -> &'static str {
            "alternating"
        }
    }

    fn options() -> FetchOptions {
        FetchOptions {
            output_dir: "downloads".into(),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_single_attempt_per_url() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("playlists.txt");
        std::fs::write(&path, "https://a\n# c\nhttps://b\nhttps://c\n").unwrap();
        let downloader = AlternatingDownloader::default();

        let outcome = run_simple(&path, &downloader, &options()).await;

        assert_eq!(
            outcome,
            SimpleRunOutcome::Completed {
                processed: 3,
                succeeded: 2,
                failures: vec![SimpleFailure {
                    url: "https://b".to_string(),
                    reason: "exited with code 1".to_string(),
                }],
            }
        );
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_missing_tool_reason_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("playlists.txt");
        std::fs::write(&path, "https://a\n").unwrap();
        let ytdlp = YtDlp::new("/nonexistent/yt-dlp").with_profile(ArgProfile::Minimal);

        let outcome = run_simple(&path, &ytdlp, &options()).await;

        match outcome {
            SimpleRunOutcome::Completed {
                processed,
                succeeded,
                failures,
            } => {
                assert_eq!((processed, succeeded), (1, 0));
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].url, "https://a");
                assert!(
                    failures[0].reason.contains("Failed to execute /nonexistent/yt-dlp"),
                    "got: {}",
                    failures[0].reason
                );
            }
            other => panic!("expected a completed run, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_stops_before_downloading() {
        let temp = tempfile::tempdir().unwrap();
        let downloader = AlternatingDownloader::default();

        let outcome = run_simple(&temp.path().join("nope.txt"), &downloader, &options()).await;

        assert_eq!(outcome, SimpleRunOutcome::MissingFile);
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_list_stops_before_downloading() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("playlists.txt");
        std::fs::write(&path, "\n# nothing\n").unwrap();
        let downloader = AlternatingDownloader::default();

        let outcome = run_simple(&path, &downloader, &options()).await;

        assert_eq!(outcome, SimpleRunOutcome::NoUrls);
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_directory_is_unreadable() {
        let temp = tempfile::tempdir().unwrap();
        let downloader = AlternatingDownloader::default();

        let outcome = run_simple(temp.path(), &downloader, &options()).await;

        assert_eq!(outcome, SimpleRunOutcome::Unreadable);
    }
}
