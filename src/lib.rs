use anyhow::{Context as _, Result};
use tracing::{info, Level};

use crate::{
    config::{Config, Mode},
    gossip::{GossipNode, RoomTicket},
    protocol::{Peer, Session},
    state::GameSession,
    utils::AppStore,
};

pub mod channel;
pub mod config;
pub mod console;
pub mod game;
pub mod gossip;
pub mod protocol;
pub mod state;
pub mod utils;

/// Log to stderr so the board on stdout stays readable.
pub fn init_tracing(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .pretty()
        .with_ansi(false)
        .init();
}

/// Bring up the node, enter the room and play until the user quits.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting app");
    let key = AppStore::acquire(&config.data_dir)?.get_secret_key()?;
    let node = GossipNode::spawn(key).await.context("failed to spawn node")?;

    let ticket = match &config.mode {
        Mode::Host => RoomTicket::new(utils::new_room_id()),
        Mode::Join { invite } => RoomTicket::deserialize(utils::parse_invite(invite))
            .context("invite does not contain a valid room ticket")?,
    };
    let (transport, events) = node.join(&ticket)?;
    let invite = utils::invite_link(&config.base_url, &node.share_ticket(&ticket).serialize());
    info!(room = %ticket.room_id, "entered room");

    let session = Session::new(node.node_id().to_string(), ticket.room_id.clone());
    let game = GameSession::spawn(Peer::new(session), transport, events);
    let result = console::run(&game, &invite).await;

    drop(game);
    node.shutdown().await;
    result
}
