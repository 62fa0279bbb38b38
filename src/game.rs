use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod board;
pub mod hand;
pub mod win;

pub use board::{color_of, Board, InvalidBoard, Stone, BOARD_SIZE};
pub use hand::{negotiate, Hand, Phase};
pub use win::{winning_line, WIN_LENGTH};

/// A point on the board, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether the coordinate lies on the board.
    pub fn in_bounds(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// Step one cell in direction `(dx, dy)`, or `None` when that leaves the board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Coord> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        let next = Coord::new(x, y);
        next.in_bounds().then_some(next)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Stone colour. Never stored, always derived from play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Colour of the odd-numbered moves, including the very first stone.
    First,
    /// Colour of the even-numbered moves.
    Second,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::First => Color::Second,
            Color::Second => Color::First,
        }
    }
}

/// Reasons a move is refused. None of them are fatal: a refused move leaves
/// the state untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("that point is already taken")]
    OccupiedCell,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("the game is over")]
    GameOver,
    #[error("that point is off the board")]
    OutOfBounds,
    #[error("no stone has been proposed")]
    NoPendingMove,
    #[error("there is no opponent in the room")]
    NoOpponent,
}

/// Result of committing a stone to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub stone: Stone,
    /// The five highlighted stones when this move won, otherwise empty.
    pub winning_line: Vec<Coord>,
}

/// Everything two peers have to agree on for one game.
///
/// A game is replaced wholesale on restart, never partially reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateRepr", into = "GameStateRepr")]
pub struct GameState {
    board: Board,
    finished: bool,
    /// Locally proposed stone awaiting confirmation. Never leaves this peer.
    pending: Option<Coord>,
}

/// What goes over the wire. The pending move stays behind.
#[derive(Serialize, Deserialize)]
struct GameStateRepr {
    board: Board,
    finished: bool,
}

impl From<GameState> for GameStateRepr {
    fn from(game: GameState) -> Self {
        Self {
            board: game.board,
            finished: game.finished,
        }
    }
}

impl TryFrom<GameStateRepr> for GameState {
    type Error = InvalidBoard;

    /// Replays the log so the end of the game and its highlights are derived,
    /// never taken on trust.
    fn try_from(repr: GameStateRepr) -> Result<Self, Self::Error> {
        let mut replayed = GameState::new();
        for (i, coord) in repr.board.moves().iter().enumerate() {
            replayed
                .commit(*coord)
                .map_err(|err| InvalidBoard(format!("move {} at {coord}: {err}", i + 1)))?;
        }
        if replayed.finished != repr.finished {
            return Err(InvalidBoard(format!(
                "claims finished={} but the moves say {}",
                repr.finished, replayed.finished
            )));
        }
        if replayed.board != repr.board {
            return Err(InvalidBoard("winning line highlights do not match the moves".into()));
        }
        Ok(replayed)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create a fresh game with an empty board.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            finished: false,
            pending: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn move_count(&self) -> usize {
        self.board.move_count()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else {
            Phase::InProgress
        }
    }

    pub fn pending(&self) -> Option<Coord> {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, coord: Option<Coord>) {
        self.pending = coord;
    }

    /// Apply a stone, whoever played it, and check whether it ends the game.
    ///
    /// This is the one transition local and remote moves share, so both
    /// peers build identical boards from identical move sequences.
    pub fn commit(&mut self, coord: Coord) -> Result<Committed, MoveError> {
        if self.finished {
            return Err(MoveError::GameOver);
        }
        let stone = self.board.place(coord)?;
        let winning_line = winning_line(&self.board, coord);
        if !winning_line.is_empty() {
            self.board.mark_winning(&winning_line);
            self.finished = true;
        }
        Ok(Committed {
            stone,
            winning_line,
        })
    }
}
