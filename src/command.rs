use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::library::{build_playlist, LibraryError, LibraryPath};
use crate::mpv::{
  ControlClient, ControlCommand, DetachedJob, IpcError, PlayerSupervisor, ProcessError, Terminator,
};

/// Anything that ends an invocation with a non-zero status.
#[derive(Error, Debug)]
pub enum BardError {
  #[error(transparent)]
  Library(#[from] LibraryError),
  #[error(transparent)]
  Process(#[from] ProcessError),
  #[error(transparent)]
  Ipc(#[from] IpcError),
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("Failed to start async runtime: {0}")]
  Runtime(#[source] std::io::Error),
}

/// Everything `play` needs, fixed once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
  path: LibraryPath,
}

impl PlayRequest {
  /// Blank `album` or `music` values count as not given.
  pub fn new(
    artist: impl Into<String>,
    album: Option<String>,
    music: Option<String>,
  ) -> Result<Self, LibraryError> {
    let given = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    Ok(Self {
      path: LibraryPath::new(artist, given(album), given(music))?,
    })
  }

  pub fn path(&self) -> &LibraryPath {
    &self.path
  }
}

/// Resolved user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Play(PlayRequest),
  Control(ControlCommand),
  Exit,
}

/// Maps actions onto the library, the player launcher, the control socket
/// and the kill command.
#[derive(Debug, Clone)]
pub struct Dispatcher {
  library_root: PathBuf,
  supervisor: PlayerSupervisor,
  client: ControlClient,
  terminator: Terminator,
}

impl Dispatcher {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      library_root: config.library_root.clone(),
      supervisor: PlayerSupervisor::new(config.mpv_path(), config.mpv_args.clone()),
      client: ControlClient::new(config.connect_timeout()),
      terminator: Terminator::default(),
    }
  }

  pub fn from_parts(
    library_root: impl Into<PathBuf>,
    supervisor: PlayerSupervisor,
    client: ControlClient,
    terminator: Terminator,
  ) -> Self {
    Self {
      library_root: library_root.into(),
      supervisor,
      client,
      terminator,
    }
  }

  pub fn client(&self) -> &ControlClient {
    &self.client
  }

  pub async fn dispatch(&self, action: Action) -> Result<(), BardError> {
    match action {
      Action::Play(request) => {
        let job = self.play(&request)?;
        log::info!("Started {:?} with {} tracks", job.program(), job.tracks());
      }
      Action::Control(cmd) => self.client.send(cmd).await?,
      Action::Exit => {
        println!("Killing every mpv instance...");
        self.terminator.kill_all().await?;
      }
    }
    Ok(())
  }

  /// Resolve, build the playlist, launch.
  pub fn play(&self, request: &PlayRequest) -> Result<DetachedJob, BardError> {
    let target = request.path().resolve(&self.library_root);
    log::debug!("Resolved {:?} to {}", request.path(), target.display());
    let playlist = build_playlist(&target)?;
    Ok(self.supervisor.spawn(&playlist)?)
  }
}
