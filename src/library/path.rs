//! Artist/album/track addressing under the library root.

use std::path::{Component, Path, PathBuf};

use super::error::LibraryError;

/// File extensions handed to the player when a whole folder is played.
pub const AUDIO_EXTENSIONS: [&str; 3] = [".mp3", ".flac", ".wav"];

/// Case-sensitive suffix match against [`AUDIO_EXTENSIONS`].
pub fn is_audio_name(name: &str) -> bool {
  AUDIO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Check that `segment` names a single entry inside its parent.
pub fn validate_segment(segment: &str) -> Result<(), LibraryError> {
  let mut components = Path::new(segment).components();
  match (components.next(), components.next()) {
    (Some(Component::Normal(_)), None) if !segment.contains('/') => Ok(()),
    _ => Err(LibraryError::InvalidSegment(segment.to_string())),
  }
}

/// `artist[/album[/track]]` relative to the library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPath {
  artist: String,
  album: Option<String>,
  track: Option<String>,
}

impl LibraryPath {
  pub fn new(
    artist: impl Into<String>,
    album: Option<String>,
    track: Option<String>,
  ) -> Result<Self, LibraryError> {
    let artist = artist.into();
    validate_segment(&artist)?;
    for segment in album.iter().chain(track.iter()) {
      validate_segment(segment)?;
    }
    Ok(Self {
      artist,
      album,
      track,
    })
  }

  /// Filesystem location of this path under `root`.
  pub fn resolve(&self, root: &Path) -> PathBuf {
    let mut path = root.join(&self.artist);
    if let Some(album) = &self.album {
      path.push(album);
    }
    if let Some(track) = &self.track {
      path.push(track);
    }
    path
  }
}
