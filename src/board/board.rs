//! Board structure: a dynamic N×N grid of stones

use crate::{EngineError, Result};

use super::{Pos, Stone};

/// Default board size when none is given (standard Gomoku board)
pub const DEFAULT_BOARD_SIZE: usize = 15;

/// Game board: a square grid of cells.
///
/// Cloning a `Board` copies the grid; nodes in the search tree each hold
/// their own snapshot and never alias another node's cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Stone>,
}

impl Board {
    /// Create an empty board of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Stone::Empty; size * size],
        }
    }

    /// Build a board from a host-side numeric grid.
    ///
    /// The grid must be square and every cell must be 0 (empty), 1 (black)
    /// or 2 (white). Anything else is rejected before it can reach the
    /// search loop.
    pub fn from_grid(grid: &[Vec<u8>]) -> Result<Self> {
        let size = grid.len();
        let mut board = Board::new(size);
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != size {
                return Err(EngineError::NotSquare {
                    row,
                    len: cells.len(),
                    size,
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                let stone = Stone::from_id(value)
                    .ok_or(EngineError::InvalidCell { row, col, value })?;
                board.cells[row * size + col] = stone;
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.cells[pos.row * self.size + pos.col]
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    /// Place a stone
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        self.cells[pos.row * self.size + pos.col] = stone;
    }

    /// Check whether signed coordinates land on the board
    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.size as i32 && col >= 0 && col < self.size as i32
    }

    /// Total stones on board
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Stone::Empty).count()
    }

    /// Check if board is empty
    pub fn is_board_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == Stone::Empty)
    }

    /// Check if no empty cell remains
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Stone::Empty)
    }

    /// The center cell, `(size/2, size/2)`.
    #[inline]
    pub fn center(&self) -> Pos {
        Pos::new(self.size / 2, self.size / 2)
    }

    /// All empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let pos = Pos::new(row, col);
                if self.is_empty(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}
