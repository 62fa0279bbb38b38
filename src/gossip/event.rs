use std::collections::BTreeSet;

use iroh::NodeId;
use iroh_gossip::net::{Event, GossipEvent};
use tracing::{debug, warn};

use super::wire::WireMessage;
use crate::channel::ChannelEvent;

/// Turns raw gossip events into channel membership.
///
/// Gossip reports neighbours symmetrically, but only the peer that was
/// already in the room should answer with the game. So a neighbour we
/// dialled from the ticket is silent, unless it comes back after going down.
#[derive(Debug, Clone)]
pub struct Membership {
    bootstrap: BTreeSet<NodeId>,
    departed: BTreeSet<NodeId>,
}

impl Membership {
    pub fn new(bootstrap: BTreeSet<NodeId>) -> Self {
        Self {
            bootstrap,
            departed: BTreeSet::new(),
        }
    }

    pub fn translate(&mut self, event: Event) -> Vec<ChannelEvent> {
        match event {
            Event::Gossip(GossipEvent::Joined(neighbors)) => neighbors
                .into_iter()
                .filter_map(|node_id| self.neighbor_up(node_id))
                .collect(),
            Event::Gossip(GossipEvent::NeighborUp(node_id)) => {
                self.neighbor_up(node_id).into_iter().collect()
            }
            Event::Gossip(GossipEvent::NeighborDown(node_id)) => {
                vec![self.neighbor_down(node_id)]
            }
            Event::Gossip(GossipEvent::Received(message)) => {
                received(&message.content).into_iter().collect()
            }
            Event::Lagged => {
                warn!("gossip receiver lagged, some messages were lost");
                Vec::new()
            }
        }
    }

    pub fn neighbor_up(&mut self, node_id: NodeId) -> Option<ChannelEvent> {
        let returning = self.departed.remove(&node_id);
        if !returning && self.bootstrap.contains(&node_id) {
            debug!(%node_id, "bootstrap node is up");
            return None;
        }
        Some(ChannelEvent::MemberJoined {
            peer: node_id.to_string(),
        })
    }

    pub fn neighbor_down(&mut self, node_id: NodeId) -> ChannelEvent {
        self.departed.insert(node_id);
        ChannelEvent::MemberLeft {
            peer: node_id.to_string(),
        }
    }
}

/// Unwrap a payload. Anything that is not one of our envelopes is dropped.
pub fn received(content: &[u8]) -> Option<ChannelEvent> {
    match WireMessage::decode(content) {
        Ok(message) => {
            debug!(from = %message.from, sent_timestamp = message.timestamp, "received message");
            Some(ChannelEvent::Message {
                from: message.from.to_string(),
                text: message.text,
            })
        }
        Err(err) => {
            warn!("received invalid message: {err:#}");
            None
        }
    }
}
