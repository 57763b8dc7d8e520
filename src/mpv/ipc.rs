//! One-shot IPC connection to MPV.
//!
//! Each control message opens the socket, writes a single JSON line and
//! closes. Nothing is read back.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;

use super::protocol::CommandEnvelope;

#[derive(Error, Debug)]
pub enum IpcError {
  #[error("Could not connect to mpv at {path} (is the player running?): {source}")]
  ConnectionFailed {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to encode command: {0}")]
  Encoding(#[from] serde_json::Error),
  #[error("Write failed: {0}")]
  WriteFailed(#[source] std::io::Error),
  #[error("No answer from mpv socket after {0:?}")]
  Timeout(Duration),
  #[error("Command cancelled")]
  Cancelled,
}

/// Deliver one envelope to the socket at `path`.
///
/// The whole exchange (connect, write, shutdown) is bounded by `timeout` and
/// aborted as soon as `cancel` fires.
pub async fn send_once(
  path: &Path,
  envelope: &CommandEnvelope,
  timeout: Duration,
  cancel: &CancellationToken,
) -> Result<(), IpcError> {
  deliver(path, connect(path), envelope, timeout, cancel).await
}

async fn connect(path: &Path) -> Result<UnixStream, IpcError> {
  UnixStream::connect(path)
    .await
    .map_err(|source| IpcError::ConnectionFailed {
      path: path.display().to_string(),
      source,
    })
}

/// Run `connect`, then write the envelope to the stream it yields.
async fn deliver<C, S>(
  path: &Path,
  connect: C,
  envelope: &CommandEnvelope,
  timeout: Duration,
  cancel: &CancellationToken,
) -> Result<(), IpcError>
where
  C: Future<Output = Result<S, IpcError>>,
  S: AsyncWrite + Unpin,
{
  // Encode before connecting.
  let payload = envelope.encode()?;
  log::debug!("Sending MPV command: {}", String::from_utf8_lossy(&payload).trim_end());

  let exchange = async {
    let mut stream = connect.await?;
    write_line(&mut stream, &payload).await
  };

  tokio::select! {
    biased;
    _ = cancel.cancelled() => {
      log::debug!("MPV IPC cancelled on {}", path.display());
      Err(IpcError::Cancelled)
    }
    result = tokio::time::timeout(timeout, exchange) => match result {
      Ok(inner) => inner,
      Err(_) => {
        log::warn!("MPV IPC timed out after {:?} on {}", timeout, path.display());
        Err(IpcError::Timeout(timeout))
      }
    },
  }
}

async fn write_line<S: AsyncWrite + Unpin>(stream: &mut S, payload: &[u8]) -> Result<(), IpcError> {
  stream.write_all(payload).await.map_err(IpcError::WriteFailed)?;
  stream.flush().await.map_err(IpcError::WriteFailed)?;
  stream.shutdown().await.map_err(IpcError::WriteFailed)?;
  log::debug!("MPV command written to socket");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mpv::protocol::ControlCommand;
  use tokio::io::AsyncReadExt;
  use tokio::net::UnixListener;

  #[tokio::test]
  async fn test_writes_single_line_then_closes() {
    let dir = tempfile::tempdir().unwrap();
    let sock = dir.path().join("mpv.sock");
    let listener = UnixListener::bind(&sock).unwrap();

    let server = tokio::spawn(async move {
      let (mut stream, _) = listener.accept().await.unwrap();
      let mut received = String::new();
      stream.read_to_string(&mut received).await.unwrap();
      received
    });

    send_once(
      &sock,
      &ControlCommand::Pause.to_envelope(),
      Duration::from_secs(5),
      &CancellationToken::new(),
    )
    .await
    .unwrap();

    let received = server.await.unwrap();
    assert_eq!(received, "{\"command\":[\"cycle\",\"pause\"]}\n");
  }

  #[tokio::test]
  async fn test_missing_socket_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let sock = dir.path().join("absent.sock");

    let err = send_once(
      &sock,
      &ControlCommand::Next.to_envelope(),
      Duration::from_secs(5),
      &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IpcError::ConnectionFailed { .. }));
  }

  #[tokio::test]
  async fn test_cancelled_before_connect() {
    let dir = tempfile::tempdir().unwrap();
    let sock = dir.path().join("mpv.sock");
    let _listener = UnixListener::bind(&sock).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = send_once(
      &sock,
      &ControlCommand::Prev.to_envelope(),
      Duration::from_secs(5),
      &cancel,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IpcError::Cancelled));
  }

  #[tokio::test]
  async fn test_hung_connect_times_out() {
    let timeout = Duration::from_millis(50);
    let started = std::time::Instant::now();

    let err = deliver(
      Path::new("/tmp/mpvsocket"),
      std::future::pending::<Result<UnixStream, IpcError>>(),
      &ControlCommand::Pause.to_envelope(),
      timeout,
      &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IpcError::Timeout(d) if d == timeout));
    assert!(started.elapsed() < Duration::from_secs(5));
  }

  #[tokio::test]
  async fn test_wedged_reader_times_out() {
    // The peer never reads, so a write larger than the pipe buffer stalls.
    let (client, _server) = tokio::io::duplex(4);
    let timeout = Duration::from_millis(50);

    let err = deliver(
      Path::new("/tmp/mpvsocket"),
      async { Ok(client) },
      &ControlCommand::SetVolume(55).to_envelope(),
      timeout,
      &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IpcError::Timeout(_)));
  }

  #[tokio::test]
  async fn test_cancelled_while_connecting() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(20)).await;
      trigger.cancel();
    });

    let err = deliver(
      Path::new("/tmp/mpvsocket"),
      std::future::pending::<Result<UnixStream, IpcError>>(),
      &ControlCommand::Next.to_envelope(),
      Duration::from_secs(30),
      &cancel,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, IpcError::Cancelled));
  }

  #[tokio::test]
  async fn test_delivers_over_any_stream() {
    let (client, mut server) = tokio::io::duplex(1024);

    deliver(
      Path::new("/tmp/mpvsocket"),
      async { Ok(client) },
      &ControlCommand::Prev.to_envelope(),
      Duration::from_secs(5),
      &CancellationToken::new(),
    )
    .await
    .unwrap();

    let mut received = String::new();
    server.read_to_string(&mut received).await.unwrap();
    assert_eq!(received, "{\"command\":[\"playlist-prev\"]}\n");
  }
}
