//! Keeping two independently running peers on the same game.
//!
//! There is no server. Each peer runs a [`Peer`] state machine, broadcasts
//! the [`Message`]s it returns, and feeds every channel event back into it.

mod message;
mod peer;
mod view;

pub use message::{JoinSync, Message};
pub use peer::Peer;
pub use view::{GameView, Presence, Status};

/// Who we are, where we are, and whether anyone else is there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    local_peer_id: String,
    room_id: String,
    has_opponent: bool,
}

impl Session {
    pub fn new(local_peer_id: impl Into<String>, room_id: impl Into<String>) -> Self {
        Self {
            local_peer_id: local_peer_id.into(),
            room_id: room_id.into(),
            has_opponent: false,
        }
    }

    pub fn local_peer_id(&self) -> &str {
        &self.local_peer_id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Reflects channel membership, not game logic.
    pub fn has_opponent(&self) -> bool {
        self.has_opponent
    }
}
