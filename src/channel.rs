//! What the game needs from a messaging channel, and nothing more.

mod memory;

pub use memory::{MemoryChannel, MemoryTransport};
use n0_future::boxed::BoxStream;

/// Something that happened on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A text broadcast, possibly our own.
    Message { from: String, text: String },
    /// Another member arrived. Only members already present are told.
    MemberJoined { peer: String },
    /// Another member is gone. May arrive long after the fact.
    MemberLeft { peer: String },
}

/// Inbound side of a channel.
pub type ChannelReceiver = BoxStream<anyhow::Result<ChannelEvent>>;

/// Outbound side of a channel.
pub trait Transport: Send + Sync + 'static {
    /// Broadcast `text` to every member. Never waits on the network; an error
    /// means the channel itself is gone.
    fn send(&self, text: String) -> anyhow::Result<()>;
}
