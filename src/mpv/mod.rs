//! MPV IPC module - spawns and controls external MPV player via JSON IPC.
//!
//! Architecture:
//! - `process.rs` - MPV binary detection, spawning and kill-by-name
//! - `ipc.rs` - One-shot Unix socket delivery with timeout and cancellation
//! - `protocol.rs` - Control commands and their JSON envelope
//! - `client.rs` - Control client with one method per command

mod client;
mod ipc;
mod process;
mod protocol;

pub use client::{ControlClient, DEFAULT_CONNECT_TIMEOUT};
pub use ipc::IpcError;
pub use process::{
  find_mpv, ipc_path, DetachedJob, PlayerSupervisor, ProcessError, Terminator, SOCKET_PATH,
};
pub use protocol::{parse_volume, CommandEnvelope, ControlCommand, DecodeError};
