//! URL list loading
//!
//! The list is a plain text file with one URL per line. Blank lines and lines
//! whose first non-whitespace character is `#` are skipped; everything else is
//! kept, trimmed, in file order. Duplicates are kept.

use crate::error::{Error, Result};
use std::path::Path;

/// Marker that starts a comment line
const COMMENT_MARKER: char = '#';

/// Extract URLs from the contents of a URL list
pub fn parse_urls(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(str::to_string)
        .collect()
}

/// Read and parse the URL list at `path`
///
/// # Errors
///
/// Returns [`Error::UrlFile`] when the file is missing or cannot be read as
/// UTF-8 text. Callers decide whether that is fatal; the orchestrator treats
/// it as an empty list.
pub async fn load_urls(path: &Path) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::UrlFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_urls(&contents))
}
