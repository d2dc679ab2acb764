//! Minimal playlist downloader: one yt-dlp attempt per URL, no retries, no log file

use clap::Parser;
use playlist_dl::{
    ArgProfile, FetchOptions, RunEnd, SimpleRunOutcome, YtDlp, run_simple, run_until,
    wait_for_signal,
};
use std::path::PathBuf;

/// Download every playlist listed in a text file, one attempt each
#[derive(Debug, Parser)]
#[command(name = "playlist-dl-simple", version, about)]
struct Cli {
    /// File with playlist URLs, one per line
    #[arg(default_value = "playlists.txt")]
    urls_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let ytdlp = YtDlp::from_path()
        .unwrap_or_else(|| YtDlp::new(YtDlp::BINARY_NAME))
        .with_profile(ArgProfile::Minimal);
    let options = FetchOptions {
        output_dir: PathBuf::from("downloads"),
        timeout: None,
    };

    match run_until(run_simple(&cli.urls_file, &ytdlp, &options), wait_for_signal()).await {
        RunEnd::Finished(SimpleRunOutcome::Completed { failures, .. }) => {
            if !failures.is_empty() {
                println!("\n{} playlist(s) failed:", failures.len());
                for failure in &failures {
                    println!("  {}: {}", failure.url, failure.reason);
                }
            }
            println!("\nFinished!");
        }
        RunEnd::Finished(_) => {}
        RunEnd::Interrupted(signal) => {
            println!("\nInterrupted by user ({signal})");
            println!("\nFinished!");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_urls_file() {
        let cli = Cli::try_parse_from(["playlist-dl-simple"]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.urls_file, PathBuf::from("playlists.txt"));
    }

    #[test]
    fn test_rejects_flags() {
        assert!(Cli::try_parse_from(["playlist-dl-simple", "--max-retries", "2"]).is_err());
    }
}
