//! Game rules for Gomoku
//!
//! This module implements terminal-position detection:
//! - Five-in-a-row check anchored at the most recent move
//! - Draw detection (no empty cell left)
//! - Full-board five-in-a-row scan for boundary code and tests

pub mod win;

// Re-exports for convenient access
pub use win::{find_five, has_five, outcome_at, Outcome};
