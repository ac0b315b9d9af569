//! Monte Carlo Tree Search for Gomoku
//!
//! Contains:
//! - Arena-allocated search tree with UCT statistics
//! - Uniform and near-place playout policies
//! - The four-phase search loop (selection, expansion, rollout,
//!   backpropagation)

pub mod mcts;
pub mod node;
pub mod playout;

pub use mcts::MctsSearcher;
pub use node::{Node, NodeId, Tree};
pub use playout::{PlayoutPolicy, PlayoutResult, DEFAULT_NEAR_DISTANCE};
