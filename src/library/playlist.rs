//! Playlist construction from a file or an album folder.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::LibraryError;
use super::path::is_audio_name;

/// Ordered tracks handed to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist(Vec<PathBuf>);

impl Playlist {
  pub fn new(tracks: Vec<PathBuf>) -> Self {
    Self(tracks)
  }

  pub fn tracks(&self) -> &[PathBuf] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Build the playlist for `target`.
///
/// A file plays on its own whatever its extension. A folder contributes its
/// direct audio files in the order the filesystem lists them; nested folders
/// are ignored.
pub fn build_playlist(target: &Path) -> Result<Playlist, LibraryError> {
  let not_found = |source: std::io::Error| LibraryError::NotFound {
    path: target.to_path_buf(),
    source,
  };

  let metadata = fs::metadata(target).map_err(not_found)?;
  if metadata.is_file() {
    log::debug!("Playing single file {}", target.display());
    return Ok(Playlist::new(vec![target.to_path_buf()]));
  }

  let mut tracks = Vec::new();
  for entry in fs::read_dir(target).map_err(not_found)? {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        log::warn!("Skipping unreadable entry in {}: {}", target.display(), e);
        continue;
      }
    };
    let path = entry.path();
    if path.is_file() && is_audio_name(&entry.file_name().to_string_lossy()) {
      tracks.push(path);
    }
  }

  if tracks.is_empty() {
    return Err(LibraryError::Empty(target.to_path_buf()));
  }
  log::debug!("Found {} tracks in {}", tracks.len(), target.display());
  Ok(Playlist::new(tracks))
}
