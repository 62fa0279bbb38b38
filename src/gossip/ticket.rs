use std::collections::BTreeSet;

use anyhow::Result;
use iroh::NodeId;
use iroh_base::ticket::Ticket;
pub use iroh_gossip::proto::TopicId;
use serde::{Deserialize, Serialize};

/// Everything a peer needs to find a room: its id and who to dial first.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoomTicket {
    pub room_id: String,
    pub bootstrap: BTreeSet<NodeId>,
}

impl RoomTicket {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            bootstrap: Default::default(),
        }
    }

    /// The gossip topic for this room. Every peer derives the same one.
    pub fn topic_id(&self) -> TopicId {
        TopicId::from_bytes(*blake3::hash(self.room_id.as_bytes()).as_bytes())
    }

    pub fn deserialize(input: &str) -> Result<Self> {
        <Self as Ticket>::deserialize(input.trim()).map_err(Into::into)
    }

    pub fn serialize(&self) -> String {
        <Self as Ticket>::serialize(self)
    }
}

impl Ticket for RoomTicket {
    const KIND: &'static str = "gomoku";

    fn to_bytes(&self) -> Vec<u8> {
        postcard::to_stdvec(&self).unwrap_or_default()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, iroh_base::ticket::Error> {
        let ticket = postcard::from_bytes(bytes)?;
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iroh::SecretKey;

    #[test]
    fn survives_text_form() {
        let mut ticket = RoomTicket::new("a1B2c3D4e5");
        ticket
            .bootstrap
            .insert(SecretKey::generate(rand::rngs::OsRng).public());

        let text = ticket.serialize();
        assert!(text.starts_with("gomoku"));
        assert_eq!(RoomTicket::deserialize(&text).unwrap(), ticket);
        assert_eq!(RoomTicket::deserialize(&format!("  {text}\n")).unwrap(), ticket);
    }

    #[test]
    fn topic_depends_only_on_the_room() {
        let a = RoomTicket::new("room-one");
        let mut b = RoomTicket::new("room-one");
        b.bootstrap
            .insert(SecretKey::generate(rand::rngs::OsRng).public());
        assert_eq!(a.topic_id(), b.topic_id());
        assert_ne!(a.topic_id(), RoomTicket::new("room-two").topic_id());
    }

    #[test]
    fn rejects_other_kinds() {
        assert!(RoomTicket::deserialize("chatabcdef").is_err());
        assert!(RoomTicket::deserialize("").is_err());
    }
}
