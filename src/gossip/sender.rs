use std::sync::Arc;

use anyhow::{anyhow, Result};
use bytes::Bytes;
use iroh::NodeId;
use iroh_gossip::net::GossipSender;
use n0_future::task::{self, AbortOnDropHandle};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::wire::WireMessage;
use crate::channel::Transport;

/// Outbound side of a gossip room.
///
/// Sends are queued and broadcast in order by a background task, so callers
/// never wait on the network.
#[derive(Debug, Clone)]
pub struct GossipTransport {
    queue: mpsc::UnboundedSender<String>,
    _broadcast_task: Arc<AbortOnDropHandle<()>>,
}

impl GossipTransport {
    pub fn new(me: NodeId, sender: GossipSender) -> Self {
        let (queue, mut outbox) = mpsc::unbounded_channel::<String>();
        let broadcast_task = AbortOnDropHandle::new(task::spawn(async move {
            while let Some(text) = outbox.recv().await {
                let bytes = match WireMessage::new(me, text).encode() {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!("dropping outbound message: {err:#}");
                        continue;
                    }
                };
                debug!(len = bytes.len(), "broadcasting");
                if let Err(err) = sender.broadcast(Bytes::from(bytes)).await {
                    warn!("broadcast task failed: {err}");
                    break;
                }
            }
        }));
        Self {
            queue,
            _broadcast_task: Arc::new(broadcast_task),
        }
    }
}

impl Transport for GossipTransport {
    fn send(&self, text: String) -> Result<()> {
        self.queue
            .send(text)
            .map_err(|_| anyhow!("gossip broadcast task has stopped"))
    }
}
