use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, bail, Result};
use tokio::sync::mpsc;
use tracing::debug;

use super::{ChannelEvent, ChannelReceiver, Transport};

type Members = BTreeMap<String, mpsc::UnboundedSender<ChannelEvent>>;

/// A channel that lives in this process. Useful for tests and local play.
///
/// Broadcasts reach every member including the sender, in send order.
#[derive(Clone, Default)]
pub struct MemoryChannel {
    members: Arc<Mutex<Members>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join as `peer_id`. Members already present get a join notification.
    pub fn join(&self, peer_id: impl Into<String>) -> Result<(MemoryTransport, ChannelReceiver)> {
        let peer_id = peer_id.into();
        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut members = self.lock()?;
            if members.contains_key(&peer_id) {
                bail!("{peer_id} is already in this channel");
            }
            for member in members.values() {
                let _ = member.send(ChannelEvent::MemberJoined {
                    peer: peer_id.clone(),
                });
            }
            members.insert(peer_id.clone(), tx);
        }
        debug!(%peer_id, "joined memory channel");

        let receiver = n0_future::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (Ok(event), rx))
        });
        let transport = MemoryTransport {
            peer_id,
            channel: self.clone(),
        };
        Ok((transport, Box::pin(receiver)))
    }

    /// Ids of everyone currently in the channel.
    pub fn members(&self) -> Vec<String> {
        self.lock()
            .map(|members| members.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn broadcast(&self, from: &str, text: String) -> Result<()> {
        let members = self.lock()?;
        if !members.contains_key(from) {
            bail!("{from} is not in this channel");
        }
        for member in members.values() {
            let _ = member.send(ChannelEvent::Message {
                from: from.to_string(),
                text: text.clone(),
            });
        }
        Ok(())
    }

    fn leave(&self, peer_id: &str) {
        let Ok(mut members) = self.members.lock() else {
            return;
        };
        if members.remove(peer_id).is_none() {
            return;
        }
        for member in members.values() {
            let _ = member.send(ChannelEvent::MemberLeft {
                peer: peer_id.to_string(),
            });
        }
        debug!(%peer_id, "left memory channel");
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Members>> {
        self.members
            .lock()
            .map_err(|_| anyhow!("memory channel lock poisoned"))
    }
}

/// One member's handle on a [`MemoryChannel`]. Dropping it leaves the channel.
pub struct MemoryTransport {
    peer_id: String,
    channel: MemoryChannel,
}

impl MemoryTransport {
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }
}

impl Transport for MemoryTransport {
    fn send(&self, text: String) -> Result<()> {
        self.channel.broadcast(&self.peer_id, text)
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.channel.leave(&self.peer_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n0_future::StreamExt as _;

    #[tokio::test]
    async fn only_present_members_hear_about_joins() -> Result<()> {
        let channel = MemoryChannel::new();
        let (_a, mut a_events) = channel.join("a")?;
        let (b, mut b_events) = channel.join("b")?;

        assert_eq!(
            a_events.next().await.transpose()?,
            Some(ChannelEvent::MemberJoined { peer: "b".into() })
        );

        b.send("hello".into())?;
        let expected = ChannelEvent::Message {
            from: "b".into(),
            text: "hello".into(),
        };
        // The sender hears itself; filtering is up to the receiver.
        assert_eq!(b_events.next().await.transpose()?, Some(expected.clone()));
        assert_eq!(a_events.next().await.transpose()?, Some(expected));
        Ok(())
    }

    #[tokio::test]
    async fn dropping_a_transport_leaves() -> Result<()> {
        let channel = MemoryChannel::new();
        let (a, mut a_events) = channel.join("a")?;
        let (b, _b_events) = channel.join("b")?;
        assert_eq!(channel.members(), vec!["a".to_string(), "b".to_string()]);

        drop(b);
        assert_eq!(
            a_events.next().await.transpose()?,
            Some(ChannelEvent::MemberJoined { peer: "b".into() })
        );
        assert_eq!(
            a_events.next().await.transpose()?,
            Some(ChannelEvent::MemberLeft { peer: "b".into() })
        );
        assert_eq!(channel.members(), vec!["a".to_string()]);

        drop(a);
        assert!(a_events.next().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_ids_are_refused() -> Result<()> {
        let channel = MemoryChannel::new();
        let (_a, _events) = channel.join("a")?;
        assert!(channel.join("a").is_err());
        Ok(())
    }
}
