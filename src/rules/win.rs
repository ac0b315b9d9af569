//! Win and draw detection for Gomoku
//!
//! Five or more stones in a row (horizontal, vertical or diagonal) win the
//! game. A full board with no five-in-a-row is a draw.
//!
//! The hot path is [`outcome_at`], which only inspects the four lines
//! through the most recently placed stone rather than scanning the whole
//! board.

use crate::board::{Board, Pos, Stone};

/// Direction vectors for line checking (4 directions)
const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Run length required to win
const TARGET_RUN: i32 = 5;

/// Outcome of a terminal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game continues
    Ongoing,
    /// The stone at the checked position completed a five-in-a-row
    Win,
    /// No empty cell remains and nobody has five
    Draw,
}

/// Evaluate the position after a stone was placed at `last`.
///
/// Checks the four line directions through `last` for a run of five or
/// more stones of the color at `last`, extending in both directions and
/// stopping at board edges or a differing cell. A win is reported before
/// draw: a stone that completes a five on the final empty cell still wins.
///
/// `last` must be the most recently placed stone for the result to be
/// meaningful; this is not a full-board scan.
pub fn outcome_at(board: &Board, last: Pos) -> Outcome {
    let stone = board.get(last);
    if stone != Stone::Empty && has_five_at_pos(board, last, stone) {
        return Outcome::Win;
    }
    if board.is_full() {
        return Outcome::Draw;
    }
    Outcome::Ongoing
}

/// Fast five-in-a-row check at a specific position.
///
/// Only checks 4 directions from the given position. No allocation.
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos, color: Stone) -> bool {
    for &(dr, dc) in &DIRECTIONS {
        let mut count = 1;
        // Positive direction
        let mut r = pos.row as i32 + dr;
        let mut c = pos.col as i32 + dc;
        while board.in_bounds(r, c) && board.get(Pos::new(r as usize, c as usize)) == color {
            count += 1;
            r += dr;
            c += dc;
        }
        // Negative direction
        r = pos.row as i32 - dr;
        c = pos.col as i32 - dc;
        while board.in_bounds(r, c) && board.get(Pos::new(r as usize, c as usize)) == color {
            count += 1;
            r -= dr;
            c -= dc;
        }
        if count >= TARGET_RUN {
            return true;
        }
    }
    false
}

/// Check if there's 5+ in a row anywhere for the given color
pub fn has_five(board: &Board, stone: Stone) -> bool {
    find_five(board, stone).is_some()
}

/// Find the positions of a 5-in-a-row if one exists anywhere on the board.
///
/// Returns `Some(Vec<Pos>)` with at least 5 positions if a winning line
/// exists, `None` otherwise. Slower than [`outcome_at`]; intended for
/// boundary code that has no "last move" at hand.
pub fn find_five(board: &Board, stone: Stone) -> Option<Vec<Pos>> {
    if stone == Stone::Empty {
        return None;
    }
    for row in 0..board.size() {
        for col in 0..board.size() {
            let pos = Pos::new(row, col);
            if board.get(pos) != stone {
                continue;
            }
            for &(dr, dc) in &DIRECTIONS {
                // Only start counting at the first stone of a run
                let pr = pos.row as i32 - dr;
                let pc = pos.col as i32 - dc;
                if board.in_bounds(pr, pc) && board.get(Pos::new(pr as usize, pc as usize)) == stone {
                    continue;
                }

                let mut line = vec![pos];
                let mut r = pos.row as i32 + dr;
                let mut c = pos.col as i32 + dc;
                while board.in_bounds(r, c) && board.get(Pos::new(r as usize, c as usize)) == stone {
                    line.push(Pos::new(r as usize, c as usize));
                    r += dr;
                    c += dc;
                }
                if line.len() >= TARGET_RUN as usize {
                    return Some(line);
                }
            }
        }
    }
    None
}
