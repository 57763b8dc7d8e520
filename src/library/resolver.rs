//! Completion candidates drawn from the library layout.
//!
//! Every lookup degrades to an empty list: a shell asking for completions
//! must never see an error.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::path::{is_audio_name, validate_segment};

#[derive(Debug, Clone)]
pub struct LibraryResolver {
  root: PathBuf,
}

impl LibraryResolver {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Artist folders directly under the root.
  pub fn artists(&self, to_complete: &str) -> Vec<String> {
    self.child_dirs(&[], to_complete)
  }

  /// Album folders of `artist`.
  pub fn albums(&self, artist: &str, to_complete: &str) -> Vec<String> {
    self.child_dirs(&[artist], to_complete)
  }

  /// Playable files of `artist`, inside `album` when one is given.
  pub fn tracks(&self, artist: &str, album: Option<&str>, to_complete: &str) -> Vec<String> {
    let mut prefix = vec![artist];
    prefix.extend(album);
    self.playable_files(&prefix, to_complete)
  }

  /// Names of the immediate subdirectories of `root/prefix...`.
  pub fn child_dirs(&self, prefix: &[&str], to_complete: &str) -> Vec<String> {
    let Some(dir) = self.target(prefix, to_complete) else {
      return Vec::new();
    };
    list_children(&dir, |entry| entry.file_type().is_dir())
      .into_iter()
      .filter(|name| name.starts_with(to_complete))
      .collect()
  }

  /// File names of the audio files directly inside `root/prefix...`.
  pub fn playable_files(&self, prefix: &[&str], to_complete: &str) -> Vec<String> {
    let Some(dir) = self.target(prefix, to_complete) else {
      return Vec::new();
    };
    list_children(&dir, |entry| entry.file_type().is_file())
      .into_iter()
      .filter(|name| is_audio_name(name) && name.starts_with(to_complete))
      .collect()
  }

  fn target(&self, prefix: &[&str], to_complete: &str) -> Option<PathBuf> {
    if to_complete.starts_with('-') {
      return None;
    }
    let mut dir = self.root.clone();
    for segment in prefix {
      let segment = segment.trim();
      validate_segment(segment).ok()?;
      dir.push(segment);
    }
    Some(dir)
  }
}

fn list_children(dir: &Path, keep: impl Fn(&walkdir::DirEntry) -> bool) -> Vec<String> {
  WalkDir::new(dir)
    .min_depth(1)
    .max_depth(1)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
    .filter(|entry| keep(entry))
    .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
    .collect()
}
