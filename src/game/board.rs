use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Color, Coord, MoveError};

/// Square grid, so this is the length of one row/column.
pub const BOARD_SIZE: usize = 15;

type Cells = [[Option<Stone>; BOARD_SIZE]; BOARD_SIZE];

/// Colour of the stone played as move number `move_index` (1-based).
///
/// Odd moves belong to the first mover, even moves to the second.
pub fn color_of(move_index: usize) -> Color {
    if move_index % 2 == 1 {
        Color::First
    } else {
        Color::Second
    }
}

/// A stone on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stone {
    /// 1-based play order.
    pub move_index: usize,
    /// Part of the highlighted winning line.
    pub in_winning_line: bool,
}

impl Stone {
    pub fn color(&self) -> Color {
        color_of(self.move_index)
    }
}

/// A snapshot that disagrees with its own move log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("inconsistent board snapshot: {0}")]
pub struct InvalidBoard(pub(crate) String);

/// 15x15 grid plus the ordered log of moves that produced it.
///
/// The occupied cells always carry exactly the move indices `1..=moves.len()`,
/// and `moves[i]` is where move `i + 1` went.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    /// Indexed `[x][y]`.
    cells: Cells,
    moves: Vec<Coord>,
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // print the board as a grid
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let glyph = match self.cells[x][y].map(|stone| stone.color()) {
                    Some(Color::First) => 'X',
                    Some(Color::Second) => 'O',
                    None => '.',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty gameboard
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            moves: Vec::new(),
        }
    }

    /// Get the stone on a point. Points off the board read as empty.
    pub fn get(&self, coord: Coord) -> Option<Stone> {
        if !coord.in_bounds() {
            return None;
        }
        self.cells[coord.x as usize][coord.y as usize]
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Played coordinates in order; entry `i` is move `i + 1`.
    pub fn moves(&self) -> &[Coord] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<Coord> {
        self.moves.last().copied()
    }

    /// Put the next stone on `coord`.
    ///
    /// Grid and log change together or not at all.
    pub fn place(&mut self, coord: Coord) -> Result<Stone, MoveError> {
        if !coord.in_bounds() {
            return Err(MoveError::OutOfBounds);
        }
        let cell = &mut self.cells[coord.x as usize][coord.y as usize];
        if cell.is_some() {
            return Err(MoveError::OccupiedCell);
        }
        let stone = Stone {
            move_index: self.moves.len() + 1,
            in_winning_line: false,
        };
        *cell = Some(stone);
        self.moves.push(coord);
        Ok(stone)
    }

    pub(crate) fn mark_winning(&mut self, line: &[Coord]) {
        for coord in line {
            if let Some(stone) = self
                .cells
                .get_mut(coord.x as usize)
                .and_then(|column| column.get_mut(coord.y as usize))
                .and_then(Option::as_mut)
            {
                stone.in_winning_line = true;
            }
        }
    }
}

/// Wire shape of a board. Rebuilt and checked on the way in.
#[derive(Serialize, Deserialize)]
struct BoardRepr {
    cells: Cells,
    moves: Vec<Coord>,
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        Self {
            cells: board.cells,
            moves: board.moves,
        }
    }
}

impl TryFrom<BoardRepr> for Board {
    type Error = InvalidBoard;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        let mut replayed = Board::new();
        for (i, coord) in repr.moves.iter().enumerate() {
            replayed
                .place(*coord)
                .map_err(|err| InvalidBoard(format!("move {} at {coord}: {err}", i + 1)))?;
        }
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                let claimed = repr.cells[x][y].map(|stone| stone.move_index);
                let actual = replayed.cells[x][y].map(|stone| stone.move_index);
                if claimed != actual {
                    return Err(InvalidBoard(format!(
                        "cell ({x}, {y}) holds {claimed:?} but the log says {actual:?}"
                    )));
                }
            }
        }
        // Only the highlight flags are taken from the grid as sent.
        replayed.cells = repr.cells;
        Ok(replayed)
    }
}
