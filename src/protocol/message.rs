use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::game::{Coord, GameState, Hand};

/// Everything one peer ever tells the other.
///
/// Encoded as JSON text `{"tag": ..., "data": ...}` so independently built
/// peers can talk to each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "data")]
pub enum Message {
    /// The sender confirmed a stone.
    MoveCommitted(Coord),
    /// The sender threw the game away and started over.
    RestartRequested,
    /// Full game handed to a peer that just (re)joined the room.
    JoinSync(JoinSync),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSync {
    pub state: GameState,
    /// The hand the receiver should take, already complemented by the sender.
    pub hand: Hand,
}

impl Message {
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to encode game message")
    }

    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to decode game message")
    }
}
