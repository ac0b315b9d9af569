//! Gomoku engine based on Monte Carlo Tree Search
//!
//! A five-in-a-row (Gomoku) move-search engine built on pure rollout MCTS
//! with UCT selection:
//! - Arbitrary N×N boards, stones encoded as 0 (empty), 1 (black), 2 (white)
//! - UCB1 selection with sqrt(2) exploration constant
//! - Two interchangeable playout policies: uniform over all empty cells, or
//!   "near-place" restricted to cells close to existing stones
//! - Most-visited root child as the final decision
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation (dynamic N×N grid)
//! - [`rules`]: Terminal-position detection (five-in-a-row, draw)
//! - [`search`]: The MCTS tree and the four-phase search loop
//! - [`engine`]: Main engine facade integrating all components
//!
//! # Quick Start
//!
//! ```
//! use gomoku_mcts::MctsEngine;
//!
//! // 11x11 board with a single black stone; white to move.
//! let mut grid = vec![vec![0u8; 11]; 11];
//! grid[5][5] = 1;
//!
//! let mut engine = MctsEngine::with_seed(&grid, 2, 42).unwrap();
//! let (row, col) = engine.search_move(200).unwrap();
//! assert!(row < 11 && col < 11);
//! ```
//!
//! # Search loop
//!
//! Each iteration runs the standard four MCTS phases:
//! 1. **Selection**: descend from the root by maximum UCT score to a leaf
//! 2. **Expansion**: create one child per candidate cell, shuffled once
//! 3. **Rollout**: play the position out with the configured playout policy
//! 4. **Backpropagation**: fold the result into every ancestor's statistics
//!
//! The search is strictly single-threaded; the whole tree is private state
//! of the engine instance.

pub mod board;
pub mod engine;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone};
pub use engine::{MctsEngine, SearchOutcome};
pub use rules::Outcome;
pub use search::{PlayoutPolicy, PlayoutResult};

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The input grid is not square.
    #[error("board is not square: row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    /// A cell in the input grid holds something other than 0, 1 or 2.
    #[error("invalid cell value {value} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, value: u8 },

    /// The stone identifier is not 1 or 2.
    #[error("invalid stone id {0}, expected 1 or 2")]
    InvalidStone(u8),

    /// The search finished with no legal continuation from the root.
    /// Searching an already-finished game is a caller error.
    #[error("no legal move from the current position")]
    NoLegalMove,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
