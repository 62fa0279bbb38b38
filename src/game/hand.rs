//! Which colour each peer plays, and whose turn it is.
//!
//! Neither peer is told its colour. The one that touches an empty board
//! first takes the first hand; the one that sees that stone arrive takes the
//! second. After that, turn order follows from the move count alone.

use serde::{Deserialize, Serialize};

use super::{color_of, Color, MoveError};

/// The colour this peer plays, as far as it knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hand {
    FirstMover,
    SecondMover,
    #[default]
    Undetermined,
}

impl Hand {
    pub fn color(self) -> Option<Color> {
        match self {
            Hand::FirstMover => Some(Color::First),
            Hand::SecondMover => Some(Color::Second),
            Hand::Undetermined => None,
        }
    }

    /// The hand the other peer holds when this peer holds `self`.
    pub fn complement(self) -> Self {
        match self {
            Hand::FirstMover => Hand::SecondMover,
            Hand::SecondMover => Hand::FirstMover,
            Hand::Undetermined => Hand::Undetermined,
        }
    }

    /// Hand after watching the opponent commit a stone onto a board that
    /// held `moves_played` stones.
    pub fn after_remote_move(self, moves_played: usize) -> Self {
        match moves_played {
            0 => Hand::SecondMover,
            _ => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Finished,
}

/// Gate a local move attempt.
///
/// Returns the hand the local peer holds once the move goes ahead. Anyone may
/// open an empty board and becomes the first mover by doing so; on a board in
/// play only the hand whose colour matches the next move may continue.
pub fn negotiate(hand: Hand, phase: Phase, moves_played: usize) -> Result<Hand, MoveError> {
    match (phase, hand, moves_played) {
        (Phase::Finished, _, _) => Err(MoveError::GameOver),
        (Phase::InProgress, _, 0) => Ok(Hand::FirstMover),
        (Phase::InProgress, Hand::Undetermined, _) => Err(MoveError::NotYourTurn),
        (Phase::InProgress, hand, played) if hand.color() == Some(color_of(played + 1)) => Ok(hand),
        (Phase::InProgress, _, _) => Err(MoveError::NotYourTurn),
    }
}
