//! In-process stand-ins for the download tool and the clock

use async_trait::async_trait;
use playlist_dl::{Downloader, FetchOptions, FetchOutcome, Sleeper};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Downloader that follows a per-URL script of outcomes
///
/// Once a URL's script runs out every further call for it fails.
#[derive(Default)]
pub struct ScriptedDownloader {
    scripts: Mutex<HashMap<String, Vec<FetchOutcome>>>,
    calls: Mutex<Vec<(String, FetchOptions)>>,
}

impl ScriptedDownloader {
    /// Script the outcomes for `url`, in call order
    pub fn script(self, url: &str, outcomes: Vec<FetchOutcome>) -> Self {
        let mut reversed = outcomes;
        reversed.reverse();
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), reversed);
        self
    }

    /// URLs fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Options passed to the most recent call
    pub fn last_options(&self) -> Option<FetchOptions> {
        self.calls.lock().unwrap().last().map(|(_, o)| o.clone())
    }
}

#[async_trait]
impl Downloader for ScriptedDownloader {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> FetchOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        self.scripts
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(Vec::pop)
            .unwrap_or_else(failed)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Sleeper that records requested waits and returns immediately
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Every wait requested so far
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// A typical yt-dlp failure
pub fn failed() -> FetchOutcome {
    FetchOutcome::Failed {
        exit_code: Some(1),
        stderr: "ERROR: [youtube:tab] This playlist does not exist".to_string(),
    }
}
