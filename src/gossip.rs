mod event;
mod sender;
mod ticket;
mod wire;

use std::collections::VecDeque;

use anyhow::Result;
pub use event::Membership;
pub use iroh::NodeId;
use iroh::{protocol::Router, SecretKey};
use iroh_gossip::net::{Gossip, GossipReceiver, GossipTopic, GOSSIP_ALPN};
use n0_future::StreamExt as _;
pub use sender::GossipTransport;
pub use ticket::{RoomTicket, TopicId};
use tracing::{debug, info, warn};

use crate::channel::{ChannelEvent, ChannelReceiver};

pub struct GossipNode {
    router: Router,
    gossip: Gossip,
}

impl GossipNode {
    /// Spawns a gossip node.
    pub async fn spawn(secret_key: SecretKey) -> Result<Self> {
        let endpoint = iroh::Endpoint::builder()
            .secret_key(secret_key)
            .discovery_n0()
            .alpns(vec![GOSSIP_ALPN.to_vec()])
            .bind()
            .await?;

        let node_id = endpoint.node_id();
        info!("endpoint bound");
        info!("node id: {node_id:#?}");

        let gossip = Gossip::builder().spawn(endpoint.clone()).await?;
        info!("gossip spawned");
        let router = Router::builder(endpoint)
            .accept(GOSSIP_ALPN, gossip.clone())
            .spawn();
        info!("router spawned");
        Ok(Self { router, gossip })
    }

    /// Returns the node id of this node.
    pub fn node_id(&self) -> NodeId {
        self.router.endpoint().node_id()
    }

    /// Joins the room described by `ticket`.
    ///
    /// Returns the [`GossipTransport`] to broadcast on and the stream of
    /// [`ChannelEvent`]s coming in.
    pub fn join(&self, ticket: &RoomTicket) -> Result<(GossipTransport, ChannelReceiver)> {
        let topic_id = ticket.topic_id();
        let mut bootstrap = ticket.bootstrap.clone();
        bootstrap.remove(&self.node_id());
        info!(?bootstrap, room = %ticket.room_id, "joining {topic_id}");
        let topic: GossipTopic = self
            .gossip
            .subscribe(topic_id, bootstrap.iter().copied().collect())?;
        let (sender, receiver) = topic.split();

        let inbound = Inbound {
            receiver,
            membership: Membership::new(bootstrap),
            backlog: VecDeque::new(),
        };
        let receiver = n0_future::stream::try_unfold(inbound, next_event);
        let transport = GossipTransport::new(self.node_id(), sender);
        Ok((transport, Box::pin(receiver)))
    }

    /// A copy of `ticket` others can use to reach us.
    pub fn share_ticket(&self, ticket: &RoomTicket) -> RoomTicket {
        let mut ticket = ticket.clone();
        ticket.bootstrap.insert(self.node_id());
        ticket
    }

    pub async fn shutdown(&self) {
        if let Err(err) = self.router.shutdown().await {
            warn!("failed to shutdown router cleanly: {err}");
        }
        self.router.endpoint().close().await;
    }
}

struct Inbound {
    receiver: GossipReceiver,
    membership: Membership,
    backlog: VecDeque<ChannelEvent>,
}

/// Pull the next channel event, translating gossip events as they arrive.
/// One gossip event may produce several channel events, or none.
async fn next_event(mut inbound: Inbound) -> Result<Option<(ChannelEvent, Inbound)>> {
    loop {
        if let Some(event) = inbound.backlog.pop_front() {
            return Ok(Some((event, inbound)));
        }
        let Some(event) = inbound.receiver.try_next().await? else {
            debug!("gossip receiver closed");
            return Ok(None);
        };
        let events = inbound.membership.translate(event);
        inbound.backlog.extend(events);
    }
}
