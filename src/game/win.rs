//! Five-in-a-row detection around the newest stone.

use super::{Board, Coord};

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Scan directions as `(dx, dy, axis)`, in scan order.
///
/// Opposite directions share an axis: 0 vertical, 1 anti-diagonal,
/// 2 horizontal, 3 diagonal.
const DIRECTIONS: [(i8, i8, usize); 8] = [
    (-1, -1, 3),
    (-1, 0, 2),
    (-1, 1, 1),
    (0, -1, 0),
    (0, 1, 0),
    (1, -1, 1),
    (1, 0, 2),
    (1, 1, 3),
];

/// Find the line of five completed by the stone at `at`.
///
/// Walks outward from `at` in each direction while the neighbour carries the
/// same colour, collecting neighbours per axis. The first axis to collect
/// four neighbours wins right away: those four plus `at` are returned, even
/// when the run is longer. Returns an empty vec when there is no win.
pub fn winning_line(board: &Board, at: Coord) -> Vec<Coord> {
    let Some(placed) = board.get(at) else {
        return Vec::new();
    };
    let color = placed.color();
    let mut axes: [Vec<Coord>; 4] = Default::default();

    for (dx, dy, axis) in DIRECTIONS {
        let mut cursor = at.offset(dx, dy);
        while let Some(coord) = cursor {
            match board.get(coord) {
                Some(stone) if stone.color() == color => {}
                _ => break,
            }
            axes[axis].push(coord);
            if axes[axis].len() == WIN_LENGTH - 1 {
                let mut line = std::mem::take(&mut axes[axis]);
                line.push(at);
                return line;
            }
            cursor = coord.offset(dx, dy);
        }
    }
    Vec::new()
}
