//! Control client for an already running MPV instance.

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::ipc::{send_once, IpcError};
use super::process::ipc_path;
use super::protocol::ControlCommand;

/// Default bound on a single control exchange.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends one command per call to the MPV control socket.
///
/// Holds no connection: every call connects, writes and closes, assuming
/// whatever player currently owns the socket is the one to drive.
#[derive(Debug, Clone)]
pub struct ControlClient {
  socket: PathBuf,
  timeout: Duration,
  cancel: CancellationToken,
}

impl ControlClient {
  /// Client bound to the well-known socket.
  pub fn new(timeout: Duration) -> Self {
    Self::with_socket(ipc_path(), timeout)
  }

  pub fn with_socket(socket: impl Into<PathBuf>, timeout: Duration) -> Self {
    Self {
      socket: socket.into(),
      timeout,
      cancel: CancellationToken::new(),
    }
  }

  /// Token that aborts an in-flight send when cancelled.
  pub fn cancellation_token(&self) -> CancellationToken {
    self.cancel.clone()
  }

  /// Send a command to MPV.
  pub async fn send(&self, cmd: ControlCommand) -> Result<(), IpcError> {
    log::info!("Sending {:?} to {}", cmd, self.socket.display());
    send_once(&self.socket, &cmd.to_envelope(), self.timeout, &self.cancel).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mpv::protocol::CommandEnvelope;
  use tokio::io::AsyncReadExt;
  use tokio::net::UnixListener;

  #[tokio::test]
  async fn test_set_volume_reaches_socket() {
    let dir = tempfile::tempdir().unwrap();
    let sock = dir.path().join("mpv.sock");
    let listener = UnixListener::bind(&sock).unwrap();

    let server = tokio::spawn(async move {
      let (mut stream, _) = listener.accept().await.unwrap();
      let mut received = String::new();
      stream.read_to_string(&mut received).await.unwrap();
      received
    });

    let client = ControlClient::with_socket(&sock, DEFAULT_CONNECT_TIMEOUT);
    client.send(ControlCommand::SetVolume(30)).await.unwrap();

    let envelope = CommandEnvelope::decode(&server.await.unwrap()).unwrap();
    assert_eq!(
      ControlCommand::from_envelope(&envelope).unwrap(),
      ControlCommand::SetVolume(30)
    );
  }

  #[tokio::test]
  async fn test_no_player_running() {
    let dir = tempfile::tempdir().unwrap();
    let client = ControlClient::with_socket(dir.path().join("mpvsocket"), DEFAULT_CONNECT_TIMEOUT);

    for cmd in [
      ControlCommand::Pause,
      ControlCommand::Next,
      ControlCommand::Prev,
      ControlCommand::SetVolume(30),
    ] {
      assert!(matches!(
        client.send(cmd).await,
        Err(IpcError::ConnectionFailed { .. })
      ));
    }
    // Nothing was created at the socket path.
    assert!(!dir.path().join("mpvsocket").exists());
  }

  #[tokio::test]
  async fn test_cancellation_token_is_shared() {
    let dir = tempfile::tempdir().unwrap();
    let sock = dir.path().join("mpv.sock");
    let _listener = UnixListener::bind(&sock).unwrap();

    let client = ControlClient::with_socket(&sock, DEFAULT_CONNECT_TIMEOUT);
    client.cancellation_token().cancel();

    assert!(matches!(
      client.send(ControlCommand::Pause).await,
      Err(IpcError::Cancelled)
    ));
  }
}
