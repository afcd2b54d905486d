//! Inbound wire protocol.
//!
//! Commands arrive as JSON text frames tagged by `type`. The tag set is
//! closed: anything unrecognized is a decode error, and a decode error is
//! fatal to the session that produced it.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed command frame: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A player command, one per inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    Move {
        dir: Direction,
    },
    Rotate,
    Drop,
    #[serde(rename = "pause/resume")]
    PauseResume,
    Restart {
        /// Mode selector; absent means "keep the session's starting mode".
        #[serde(default)]
        mode: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Command {
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(frame)?)
    }
}
