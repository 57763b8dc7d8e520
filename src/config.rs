//! Application configuration.
//!
//! Read from `$BARD_CONFIG_PATH` or `<config dir>/bard/config.json`. A missing
//! file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
  #[error("{0}")]
  Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
  /// Folder holding `<artist>/<album>/<track>`.
  #[serde(default = "default_library_root")]
  pub library_root: PathBuf,

  /// Custom MPV executable path (None = auto-detect).
  #[serde(default)]
  pub mpv_path: Option<String>,

  /// Additional MPV command-line arguments.
  #[serde(default)]
  pub mpv_args: Vec<String>,

  /// Upper bound for delivering one control command, in milliseconds.
  #[serde(default = "default_connect_timeout_ms")]
  pub connect_timeout_ms: u64,
}

fn default_library_root() -> PathBuf {
  dirs::home_dir()
    .unwrap_or_else(|| PathBuf::from("~"))
    .join("Músicas")
}

fn default_connect_timeout_ms() -> u64 {
  5000
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      library_root: default_library_root(),
      mpv_path: None,
      mpv_args: Vec::new(),
      connect_timeout_ms: default_connect_timeout_ms(),
    }
  }
}

impl AppConfig {
  /// Load from the resolved config path.
  pub fn load() -> Result<Self, ConfigError> {
    match resolve_config_path() {
      Some(path) => Self::load_from(&path),
      None => Ok(Self::default()),
    }
  }

  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      log::debug!("No config at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config: AppConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.validate().map_err(ConfigError::Invalid)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
  }

  /// Validate configuration values.
  pub fn validate(&self) -> Result<(), String> {
    if self.library_root.as_os_str().is_empty() {
      return Err("Library root cannot be empty".to_string());
    }
    if self.connect_timeout_ms < 1 || self.connect_timeout_ms > 60_000 {
      return Err("Connect timeout must be between 1 and 60000 milliseconds".to_string());
    }
    Ok(())
  }

  /// Explicit MPV binary, ignoring blank entries.
  pub fn mpv_path(&self) -> Option<PathBuf> {
    self
      .mpv_path
      .as_ref()
      .filter(|s| !s.trim().is_empty())
      .map(PathBuf::from)
  }

  pub fn connect_timeout(&self) -> Duration {
    Duration::from_millis(self.connect_timeout_ms)
  }
}

/// Resolve the config path from `BARD_CONFIG_PATH` or the platform config dir.
pub fn resolve_config_path() -> Option<PathBuf> {
  if let Some(p) = std::env::var_os("BARD_CONFIG_PATH") {
    return Some(PathBuf::from(p));
  }
  dirs::config_dir().map(|d| d.join("bard").join("config.json"))
}
