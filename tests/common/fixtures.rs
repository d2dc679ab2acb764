//! URL list fixtures and run configuration helpers

use playlist_dl::{Config, RetryConfig};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// URL list mixing comments, blank lines and indentation
pub const MIXED_LIST: &str = "\
# Music playlists
https://www.youtube.com/playlist?list=PL-music

   # indented comment
  https://www.youtube.com/playlist?list=PL-talks  
https://www.youtube.com/playlist?list=PL-music
";

/// Config rooted in `dir` with short retry settings
pub fn test_config(dir: &Path, max_attempts: u32, delay_secs: u64) -> Config {
    Config {
        urls_file: dir.join("playlists.txt"),
        download_dir: dir.join("downloads"),
        log_dir: dir.join("logs"),
        retry: RetryConfig {
            max_attempts,
            delay: Duration::from_secs(delay_secs),
        },
        ..Config::default()
    }
}

/// Temporary directory holding `playlists.txt` with `contents`
pub fn workspace_with_list(contents: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("playlists.txt"), contents).expect("failed to write list");
    dir
}
