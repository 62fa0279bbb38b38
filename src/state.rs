use anyhow::{anyhow, Result};
use n0_future::{task::AbortOnDropHandle, StreamExt as _};
use tokio::{
    select,
    sync::{mpsc, watch},
};
use tracing::{debug, error, info, warn};

use crate::{
    channel::{ChannelReceiver, Transport},
    game::{Coord, MoveError},
    protocol::{GameView, Message, Peer},
};

/// Something the local player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Propose(Coord),
    Confirm,
    Restart,
}

/// A running game: one [`Peer`] owned by one task.
///
/// Local commands and channel events are handled strictly one at a time by
/// that task, and a fresh [`GameView`] is published after each. Dropping the
/// session stops the task.
pub struct GameSession {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<GameView>,
    _task: AbortOnDropHandle<()>,
}

impl GameSession {
    pub fn spawn<T: Transport>(peer: Peer, transport: T, events: ChannelReceiver) -> Self {
        let (commands, command_rx) = mpsc::channel(32);
        let (view_tx, view) = watch::channel(peer.view());
        let driver = Driver {
            peer,
            transport,
            view: view_tx,
            hint: None,
        };
        let task = AbortOnDropHandle::new(n0_future::task::spawn(driver.run(command_rx, events)));
        Self {
            commands,
            view,
            _task: task,
        }
    }

    pub async fn propose(&self, coord: Coord) -> Result<()> {
        self.send(Command::Propose(coord)).await
    }

    pub async fn confirm(&self) -> Result<()> {
        self.send(Command::Confirm).await
    }

    pub async fn restart(&self) -> Result<()> {
        self.send(Command::Restart).await
    }

    pub async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow!("game session has stopped"))
    }

    /// The latest snapshot.
    pub fn view(&self) -> GameView {
        self.view.borrow().clone()
    }

    /// Watch snapshots as they are published.
    pub fn subscribe(&self) -> watch::Receiver<GameView> {
        self.view.clone()
    }
}

struct Driver<T> {
    peer: Peer,
    transport: T,
    view: watch::Sender<GameView>,
    hint: Option<MoveError>,
}

impl<T: Transport> Driver<T> {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut events: ChannelReceiver) {
        loop {
            select! {
                biased; // drain the network before acting on local input
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        debug!(?event, "channel event");
                        if let Some(reply) = self.peer.handle_event(event) {
                            self.broadcast(&reply);
                        }
                    }
                    Some(Err(err)) => error!("error receiving channel event: {err:#}"),
                    None => {
                        info!("channel closed, stopping game session");
                        break;
                    }
                },
                command = commands.recv() => match command {
                    Some(command) => self.command(command),
                    None => break,
                },
            }
            self.publish();
        }
    }

    fn command(&mut self, command: Command) {
        let outcome = match command {
            Command::Propose(coord) => self.peer.propose(coord).map(|()| None),
            Command::Confirm => self.peer.confirm().map(Some),
            Command::Restart => Ok(Some(self.peer.restart())),
        };
        match outcome {
            Ok(message) => {
                self.hint = None;
                if let Some(message) = message {
                    self.broadcast(&message);
                }
            }
            Err(err) => {
                debug!(?command, "local action refused: {err}");
                self.hint = Some(err);
            }
        }
    }

    fn broadcast(&self, message: &Message) {
        let sent = message
            .encode()
            .and_then(|text| self.transport.send(text));
        if let Err(err) = sent {
            warn!("failed to send game message: {err:#}");
        }
    }

    fn publish(&self) {
        let view = self.peer.view().with_hint(self.hint);
        self.view.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }
}
