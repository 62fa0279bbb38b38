use crate::game::{color_of, GameState, Hand, MoveError};

/// Immutable snapshot handed to whatever draws the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    /// Includes the local preview, see [`GameState::pending`].
    pub game: GameState,
    pub hand: Hand,
    pub has_opponent: bool,
    /// Why the last local action was refused, until the next one succeeds.
    pub hint: Option<MoveError>,
}

/// What the local player should be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nobody has a hand yet; first to play takes the first hand.
    Open,
    YourTurn,
    Waiting,
    Won,
    Lost,
}

/// Whether the other seat is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    /// Nobody has shown up yet, share the invite.
    Absent,
    /// We were playing someone and they dropped off.
    Offline,
}

impl GameView {
    pub fn with_hint(mut self, hint: Option<MoveError>) -> Self {
        self.hint = hint;
        self
    }

    pub fn status(&self) -> Status {
        let Some(mine) = self.hand.color() else {
            return Status::Open;
        };
        let played = self.game.move_count();
        if self.game.is_finished() {
            // The last stone played is the winning one.
            return if color_of(played) == mine {
                Status::Won
            } else {
                Status::Lost
            };
        }
        if color_of(played + 1) == mine {
            Status::YourTurn
        } else {
            Status::Waiting
        }
    }

    pub fn presence(&self) -> Presence {
        match (self.has_opponent, self.hand) {
            (true, _) => Presence::Present,
            (false, Hand::Undetermined) => Presence::Absent,
            (false, _) => Presence::Offline,
        }
    }
}
