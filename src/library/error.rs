//! Library error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a library path into a playlist.
#[derive(Debug, Error)]
pub enum LibraryError {
  #[error("Nothing found at {path}: {source}")]
  NotFound {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("No music found in: {0}")]
  Empty(PathBuf),

  #[error("Invalid library path segment: {0:?}")]
  InvalidSegment(String),
}
