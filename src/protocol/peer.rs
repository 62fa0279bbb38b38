use tracing::{debug, info, warn};

use super::{GameView, JoinSync, Message, Session};
use crate::{
    channel::ChannelEvent,
    game::{negotiate, Coord, GameState, Hand, MoveError},
};

/// One peer's view of the game, and the only thing that changes it.
///
/// Every trigger (a local click, a confirm, a restart, a channel event) is
/// one call here. Calls return the message to broadcast, if any; sending it
/// is the caller's business.
#[derive(Debug, Clone)]
pub struct Peer {
    session: Session,
    hand: Hand,
    game: GameState,
}

impl Peer {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            hand: Hand::Undetermined,
            game: GameState::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Snapshot for the rendering side.
    pub fn view(&self) -> GameView {
        GameView {
            game: self.game.clone(),
            hand: self.hand,
            has_opponent: self.session.has_opponent,
            hint: None,
        }
    }

    /// Preview a stone at `coord`. Nothing is sent until [`Peer::confirm`].
    ///
    /// A new proposal replaces the previous one.
    pub fn propose(&mut self, coord: Coord) -> Result<(), MoveError> {
        let hand = negotiate(self.hand, self.game.phase(), self.game.move_count())?;
        if !coord.in_bounds() {
            return Err(MoveError::OutOfBounds);
        }
        if self.game.board().is_occupied(coord) {
            return Err(MoveError::OccupiedCell);
        }
        if hand != self.hand {
            debug!(?hand, "hand taken by opening the board");
        }
        self.hand = hand;
        self.game.set_pending(Some(coord));
        Ok(())
    }

    /// Commit the proposed stone and return the message announcing it.
    ///
    /// The proposal is re-checked, since the board may have moved on since it
    /// was made. A proposal that no longer fits is dropped.
    pub fn confirm(&mut self) -> Result<Message, MoveError> {
        let coord = self.game.pending().ok_or(MoveError::NoPendingMove)?;
        if !self.session.has_opponent {
            return Err(MoveError::NoOpponent);
        }
        self.game.set_pending(None);

        let hand = negotiate(self.hand, self.game.phase(), self.game.move_count())?;
        let committed = self.game.commit(coord)?;
        self.hand = hand;
        debug!(%coord, index = committed.stone.move_index, "committed local move");
        if !committed.winning_line.is_empty() {
            info!(%coord, "local move completed a line of five");
        }
        Ok(Message::MoveCommitted(coord))
    }

    /// Start over locally and return the message telling the other side.
    pub fn restart(&mut self) -> Message {
        info!("restarting game");
        self.reset();
        Message::RestartRequested
    }

    /// Feed one channel event in. Returns the reply to broadcast, if any.
    pub fn handle_event(&mut self, event: ChannelEvent) -> Option<Message> {
        match event {
            ChannelEvent::Message { from, text } => {
                self.on_message(&from, &text);
                None
            }
            ChannelEvent::MemberJoined { peer } => Some(self.on_member_joined(&peer)),
            ChannelEvent::MemberLeft { peer } => {
                self.on_member_left(&peer);
                None
            }
        }
    }

    /// Decode and apply a text payload. Our own echoes and anything that does
    /// not decode are dropped.
    pub fn on_message(&mut self, from: &str, text: &str) {
        if from == self.session.local_peer_id {
            return;
        }
        match Message::decode(text) {
            Ok(message) => self.apply(message),
            Err(err) => warn!(%from, "dropping malformed payload: {err:#}"),
        }
    }

    /// Apply a message from the other peer.
    pub fn apply(&mut self, message: Message) {
        match message {
            Message::MoveCommitted(coord) => self.on_remote_move(coord),
            Message::RestartRequested => {
                info!("opponent restarted the game");
                self.reset();
            }
            Message::JoinSync(sync) => self.on_join_sync(sync),
        }
    }

    /// Someone arrived. We were here first, so hand them the game.
    pub fn on_member_joined(&mut self, peer: &str) -> Message {
        info!(%peer, moves = self.game.move_count(), "opponent joined, sending game state");
        self.session.has_opponent = true;
        Message::JoinSync(JoinSync {
            state: self.game.clone(),
            hand: self.hand.complement(),
        })
    }

    /// The other side is gone. It cannot tell us, its absence is the signal.
    pub fn on_member_left(&mut self, peer: &str) {
        info!(%peer, "opponent left");
        self.session.has_opponent = false;
    }

    fn on_remote_move(&mut self, coord: Coord) {
        let played = self.game.move_count();
        let hand = self.hand.after_remote_move(played);
        match self.game.commit(coord) {
            Ok(committed) => {
                if played == 0 {
                    // They opened first, so our own preview is void.
                    self.game.set_pending(None);
                }
                self.hand = hand;
                debug!(%coord, index = committed.stone.move_index, "applied remote move");
                if !committed.winning_line.is_empty() {
                    info!(%coord, "opponent completed a line of five");
                }
            }
            Err(err) => warn!(%coord, "ignoring remote move: {err}"),
        }
    }

    fn on_join_sync(&mut self, sync: JoinSync) {
        info!(
            moves = sync.state.move_count(),
            hand = ?sync.hand,
            "replacing game with opponent's copy"
        );
        // Pending moves never travel, so this also drops ours.
        self.game = sync.state;
        self.hand = sync.hand;
        self.session.has_opponent = true;
    }

    fn reset(&mut self) {
        self.game = GameState::new();
        self.hand = Hand::Undetermined;
    }
}
