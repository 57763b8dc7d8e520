use std::process::ExitCode;

use clap::Parser;

mod cli;
mod command;
mod completion;
mod config;
mod library;
mod mpv;

pub use cli::{Cli, Commands, Shell};
pub use command::{Action, BardError, Dispatcher, PlayRequest};
pub use config::{resolve_config_path, AppConfig, ConfigError};
pub use library::{
  build_playlist, is_audio_name, LibraryError, LibraryPath, LibraryResolver, Playlist,
  AUDIO_EXTENSIONS,
};
pub use mpv::{
  find_mpv, ipc_path, parse_volume, CommandEnvelope, ControlClient, ControlCommand, DecodeError,
  DetachedJob, IpcError, PlayerSupervisor, ProcessError, Terminator, DEFAULT_CONNECT_TIMEOUT,
  SOCKET_PATH,
};

pub fn run() -> ExitCode {
  let cli = Cli::parse();

  // Logging stays quiet by default so completion output is never polluted.
  let default_level = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
    .format_timestamp(None)
    .init();

  match execute(cli.command) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      log::debug!("Invocation failed: {:?}", e);
      eprintln!("bard: {}", e);
      ExitCode::FAILURE
    }
  }
}

fn execute(command: Commands) -> Result<(), BardError> {
  let action = match command {
    Commands::Completions { shell } => {
      print!("{}", completion::script(shell));
      return Ok(());
    }
    Commands::Complete { words } => {
      let root = match AppConfig::load() {
        Ok(config) => config.library_root,
        Err(e) => {
          log::debug!("Completing with default library root: {}", e);
          AppConfig::default().library_root
        }
      };
      for candidate in completion::complete(&LibraryResolver::new(root), &words) {
        println!("{}", candidate);
      }
      return Ok(());
    }
    Commands::Play {
      artist,
      album,
      music,
    } => Action::Play(PlayRequest::new(artist, Some(album), music)?),
    Commands::Pause => Action::Control(ControlCommand::Pause),
    Commands::Next => Action::Control(ControlCommand::Next),
    Commands::Prev => Action::Control(ControlCommand::Prev),
    Commands::Vol { level } => Action::Control(ControlCommand::SetVolume(level)),
    Commands::Exit => Action::Exit,
  };

  let config = AppConfig::load()?;
  let dispatcher = Dispatcher::new(&config);

  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .map_err(BardError::Runtime)?;

  runtime.block_on(async {
    // Ctrl-C aborts a control command stuck on a wedged socket.
    let token = dispatcher.client().cancellation_token();
    let watcher = tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        token.cancel();
      }
    });
    let result = dispatcher.dispatch(action).await;
    watcher.abort();
    result
  })
}
