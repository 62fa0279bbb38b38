use anyhow::{Context as _, Result};
use iroh::NodeId;
use serde::{Deserialize, Serialize};

use crate::utils::get_timestamp;

/// Envelope around every payload we put on the gossip topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireMessage {
    V0 {
        from: NodeId,
        timestamp: u64,
        text: String,
    },
}

/// A payload taken off the topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub from: NodeId,
    pub timestamp: u64,
    pub text: String,
}

impl WireMessage {
    pub fn new(from: NodeId, text: String) -> Self {
        Self::V0 {
            from,
            timestamp: get_timestamp(),
            text,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        postcard::to_stdvec(self).context("failed to encode wire message")
    }

    pub fn decode(bytes: &[u8]) -> Result<ReceivedMessage> {
        let message: Self = postcard::from_bytes(bytes).context("failed to decode wire message")?;
        let Self::V0 {
            from,
            timestamp,
            text,
        } = message;
        Ok(ReceivedMessage {
            from,
            timestamp,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iroh::SecretKey;

    #[test]
    fn envelope_keeps_author_and_text() {
        let from = SecretKey::generate(rand::rngs::OsRng).public();
        let bytes = WireMessage::new(from, r#"{"tag":"RestartRequested"}"#.into())
            .encode()
            .unwrap();

        let received = WireMessage::decode(&bytes).unwrap();
        assert_eq!(received.from, from);
        assert_eq!(received.text, r#"{"tag":"RestartRequested"}"#);
        assert!(received.timestamp > 0);
    }

    #[test]
    fn truncated_bytes_fail() {
        let from = SecretKey::generate(rand::rngs::OsRng).public();
        let bytes = WireMessage::new(from, "hello".into()).encode().unwrap();
        assert!(WireMessage::decode(&bytes[..bytes.len() / 2]).is_err());
        assert!(WireMessage::decode(&[]).is_err());
    }
}
