//! MPV JSON IPC protocol types.
//!
//! Reference: https://mpv.io/manual/master/#json-ipc

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
  #[error("Invalid JSON: {0}")]
  Json(#[from] serde_json::Error),
  #[error("Empty command list")]
  Empty,
  #[error("Unknown command: {0:?}")]
  Unknown(Vec<Value>),
  #[error("Volume out of range: {0}")]
  VolumeOutOfRange(String),
}

/// Control commands understood by a running player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
  /// Toggle pause.
  Pause,
  /// Skip to the next playlist entry.
  Next,
  /// Go back to the previous playlist entry.
  Prev,
  /// Set volume (0-100).
  SetVolume(u8),
}

impl ControlCommand {
  /// Ordered token list: name followed by positional arguments.
  pub fn tokens(&self) -> Vec<Value> {
    match self {
      ControlCommand::Pause => vec!["cycle".into(), "pause".into()],
      ControlCommand::Next => vec!["playlist-next".into()],
      ControlCommand::Prev => vec!["playlist-prev".into()],
      // mpv accepts the level as a string and parses it itself.
      ControlCommand::SetVolume(level) => vec![
        "set_property".into(),
        "volume".into(),
        level.to_string().into(),
      ],
    }
  }

  pub fn to_envelope(&self) -> CommandEnvelope {
    CommandEnvelope {
      command: self.tokens(),
    }
  }

  /// Recover a command from an envelope. Numeric and string volume levels are
  /// both accepted.
  pub fn from_envelope(envelope: &CommandEnvelope) -> Result<Self, DecodeError> {
    let tokens = &envelope.command;
    let first = tokens.first().ok_or(DecodeError::Empty)?;
    let Some(name) = first.as_str() else {
      return Err(DecodeError::Unknown(tokens.clone()));
    };
    let args = &tokens[1..];

    match (name, args) {
      ("cycle", [prop]) if prop.as_str() == Some("pause") => Ok(ControlCommand::Pause),
      ("playlist-next", []) => Ok(ControlCommand::Next),
      ("playlist-prev", []) => Ok(ControlCommand::Prev),
      ("set_property", [prop, level]) if prop.as_str() == Some("volume") => {
        let raw = match level {
          Value::String(s) => s.clone(),
          other => other.to_string(),
        };
        parse_volume(&raw)
          .map(ControlCommand::SetVolume)
          .ok_or(DecodeError::VolumeOutOfRange(raw))
      }
      _ => Err(DecodeError::Unknown(tokens.clone())),
    }
  }
}

/// Parse a volume level in the 0-100 range.
pub fn parse_volume(raw: &str) -> Option<u8> {
  raw.trim().parse::<u8>().ok().filter(|v| *v <= 100)
}

/// Message written to the MPV control socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
  pub command: Vec<Value>,
}

impl CommandEnvelope {
  /// Serialize to a single newline-terminated JSON line.
  pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
    let mut line = serde_json::to_vec(self)?;
    line.push(b'\n');
    Ok(line)
  }

  pub fn decode(line: &str) -> Result<Self, DecodeError> {
    Ok(serde_json::from_str(line.trim())?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_volume_wire_format() {
    let cmd = ControlCommand::SetVolume(55);
    let json = serde_json::to_string(&cmd.to_envelope()).unwrap();
    assert_eq!(json, r#"{"command":["set_property","volume","55"]}"#);
  }

  #[test]
  fn test_volume_decodes_back() {
    let envelope = CommandEnvelope::decode(r#"{"command":["set_property","volume","55"]}"#).unwrap();
    assert_eq!(
      ControlCommand::from_envelope(&envelope).unwrap(),
      ControlCommand::SetVolume(55)
    );
  }

  #[test]
  fn test_numeric_volume_accepted() {
    let envelope = CommandEnvelope::decode(r#"{"command":["set_property","volume",30]}"#).unwrap();
    assert_eq!(
      ControlCommand::from_envelope(&envelope).unwrap(),
      ControlCommand::SetVolume(30)
    );
  }

  #[test]
  fn test_navigation_tokens() {
    assert_eq!(
      serde_json::to_string(&ControlCommand::Pause.to_envelope()).unwrap(),
      r#"{"command":["cycle","pause"]}"#
    );
    assert_eq!(ControlCommand::Next.tokens(), vec![Value::from("playlist-next")]);
    assert_eq!(ControlCommand::Prev.tokens(), vec![Value::from("playlist-prev")]);
  }

  #[test]
  fn test_encode_is_single_line() {
    let bytes = ControlCommand::Next.to_envelope().encode().unwrap();
    assert_eq!(bytes.last(), Some(&b'\n'));
    assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);
  }

  #[test]
  fn test_rejects_unknown_and_out_of_range() {
    let unknown = CommandEnvelope::decode(r#"{"command":["quit"]}"#).unwrap();
    assert!(matches!(
      ControlCommand::from_envelope(&unknown),
      Err(DecodeError::Unknown(_))
    ));

    let loud = CommandEnvelope::decode(r#"{"command":["set_property","volume","130"]}"#).unwrap();
    assert!(matches!(
      ControlCommand::from_envelope(&loud),
      Err(DecodeError::VolumeOutOfRange(_))
    ));

    let numeric = CommandEnvelope::decode(r#"{"command":[42]}"#).unwrap();
    match ControlCommand::from_envelope(&numeric) {
      Err(DecodeError::Unknown(tokens)) => assert_eq!(tokens, vec![Value::from(42)]),
      other => panic!("Expected unknown command, got {:?}", other),
    }

    let empty = CommandEnvelope { command: vec![] };
    assert!(matches!(
      ControlCommand::from_envelope(&empty),
      Err(DecodeError::Empty)
    ));
  }

  #[test]
  fn test_parse_volume_bounds() {
    assert_eq!(parse_volume("0"), Some(0));
    assert_eq!(parse_volume("100"), Some(100));
    assert_eq!(parse_volume("101"), None);
    assert_eq!(parse_volume("-1"), None);
    assert_eq!(parse_volume("loud"), None);
  }
}
