//! MPV process detection, spawning and termination.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

use crate::library::Playlist;

/// Well-known control socket shared by every invocation.
pub const SOCKET_PATH: &str = "/tmp/mpvsocket";

/// Process name matched by [`Terminator::kill_all`].
pub const PLAYER_PROCESS_NAME: &str = "mpv";

#[derive(Error, Debug)]
pub enum ProcessError {
  #[error("MPV executable not found")]
  NotFound,
  #[error("Failed to spawn MPV: {0}")]
  SpawnFailed(#[from] std::io::Error),
  #[error("Failed to run {program}: {source}")]
  KillCommand {
    program: String,
    #[source]
    source: std::io::Error,
  },
  #[error("{program} exited with {status}\nOutput: {output}")]
  TerminationFailed {
    program: String,
    status: ExitStatus,
    output: String,
  },
}

/// Get the IPC socket path for MPV.
pub fn ipc_path() -> PathBuf {
  PathBuf::from(SOCKET_PATH)
}

/// Find MPV executable in common locations.
pub fn find_mpv() -> Option<PathBuf> {
  // Check PATH first
  if let Ok(path) = which::which(PLAYER_PROCESS_NAME) {
    return Some(path);
  }

  #[cfg(target_os = "macos")]
  {
    let common_paths = [
      "/usr/local/bin/mpv",
      "/opt/homebrew/bin/mpv",
      "/Applications/mpv.app/Contents/MacOS/mpv",
    ];
    for path in common_paths {
      let p = PathBuf::from(path);
      if p.exists() {
        return Some(p);
      }
    }
  }

  #[cfg(target_os = "linux")]
  {
    let common_paths = ["/usr/bin/mpv", "/usr/local/bin/mpv", "/snap/bin/mpv"];
    for path in common_paths {
      let p = PathBuf::from(path);
      if p.exists() {
        return Some(p);
      }
    }
  }

  None
}

/// A player that was started and then let go.
///
/// Offers no way to wait on, signal or query the process: its
/// lifetime is independent of the invocation that launched it.
#[derive(Debug)]
pub struct DetachedJob {
  program: PathBuf,
  tracks: usize,
}

impl DetachedJob {
  pub fn program(&self) -> &Path {
    &self.program
  }

  /// Number of playlist entries handed to the player.
  pub fn tracks(&self) -> usize {
    self.tracks
  }
}

/// Launches MPV against a playlist with the control socket enabled.
#[derive(Debug, Clone)]
pub struct PlayerSupervisor {
  mpv_path: Option<PathBuf>,
  extra_args: Vec<String>,
  socket: PathBuf,
}

impl PlayerSupervisor {
  pub fn new(mpv_path: Option<PathBuf>, extra_args: Vec<String>) -> Self {
    Self {
      mpv_path,
      extra_args,
      socket: ipc_path(),
    }
  }

  /// Arguments passed to MPV, playlist last.
  pub fn launch_args(&self, playlist: &Playlist) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
      "--no-video".into(),
      format!("--input-ipc-server={}", self.socket.display()).into(),
    ];
    args.extend(self.extra_args.iter().map(OsString::from));
    args.extend(playlist.tracks().iter().map(|t| t.as_os_str().to_owned()));
    args
  }

  /// Spawn MPV and release it immediately.
  ///
  /// Stdout and stderr stay attached to the calling terminal. Only the spawn
  /// itself is checked; whether the player later binds the socket is not.
  pub fn spawn(&self, playlist: &Playlist) -> Result<DetachedJob, ProcessError> {
    let mpv_exe = self
      .mpv_path
      .clone()
      .or_else(find_mpv)
      .ok_or(ProcessError::NotFound)?;

    log::info!(
      "Spawning MPV: {:?} with IPC: {} ({} tracks)",
      mpv_exe,
      self.socket.display(),
      playlist.len()
    );
    if !self.extra_args.is_empty() {
      log::info!("Extra MPV args: {:?}", self.extra_args);
    }

    let child = Command::new(&mpv_exe)
      .args(self.launch_args(playlist))
      .stdin(Stdio::null())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .spawn()?;
    log::debug!("MPV started with pid {}, detaching", child.id());
    // Dropping the handle neither kills nor reaps the child.
    drop(child);

    Ok(DetachedJob {
      program: mpv_exe,
      tracks: playlist.len(),
    })
  }
}

/// Kills players by process name.
///
/// Matches every process whose command line contains the name, system-wide,
/// including players this tool never launched.
#[derive(Debug, Clone)]
pub struct Terminator {
  program: String,
  args: Vec<String>,
}

impl Default for Terminator {
  fn default() -> Self {
    Self::new("pkill", ["-f", PLAYER_PROCESS_NAME])
  }
}

impl Terminator {
  pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      program: program.into(),
      args: args.into_iter().map(Into::into).collect(),
    }
  }

  /// Run the kill command and wait for it to finish.
  ///
  /// A non-zero status is an error carrying the command's combined output;
  /// for `pkill` this includes the "nothing matched" case.
  pub async fn kill_all(&self) -> Result<(), ProcessError> {
    log::info!("Running {} {:?}", self.program, self.args);
    let output = tokio::process::Command::new(&self.program)
      .args(&self.args)
      .stdin(Stdio::null())
      .output()
      .await
      .map_err(|source| ProcessError::KillCommand {
        program: self.program.clone(),
        source,
      })?;

    if !output.status.success() {
      let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
      combined.push_str(&String::from_utf8_lossy(&output.stderr));
      return Err(ProcessError::TerminationFailed {
        program: self.program.clone(),
        status: output.status,
        output: combined.trim().to_string(),
      });
    }

    cleanup_ipc();
    Ok(())
  }
}

/// Remove a socket file left behind by a killed player.
pub fn cleanup_ipc() {
  let path = ipc_path();
  if std::fs::remove_file(&path).is_ok() {
    log::debug!("Removed stale socket {}", path.display());
  }
}
