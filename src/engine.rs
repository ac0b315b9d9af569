//! Engine facade: the host-facing surface of the crate
//!
//! [`MctsEngine`] accepts a numeric grid and a stone id, runs the search
//! and hands back plain `(row, col)` coordinates, so callers never touch
//! tree internals. [`SearchOutcome`] bundles the decision with the search
//! statistics for hosts that want to display them.

use std::time::Instant;

use log::debug;

use crate::board::{Board, Stone};
use crate::search::{MctsSearcher, PlayoutPolicy};
use crate::{EngineError, Result};

/// Iterations used by [`MctsEngine::search_move_default`].
pub const DEFAULT_ITERATIONS: u32 = 5000;

/// A finished search: the chosen move plus its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The chosen cell as `(row, col)`
    pub best_move: (usize, usize),
    /// Win credit accumulated by the chosen root child
    pub win_rounds: f64,
    /// Simulations that passed through the chosen root child
    pub total_rounds: u32,
    /// Iterations the search was asked to run
    pub iterations: u32,
    /// Nodes in the search tree when the search finished
    pub node_count: usize,
    /// Depth of the search tree (lone root counts as 1)
    pub tree_depth: usize,
    /// Wall-clock search time in milliseconds
    pub elapsed_ms: u64,
}

impl SearchOutcome {
    /// Win ratio of the chosen child, 0.0 when it was never simulated.
    #[must_use]
    pub fn win_ratio(&self) -> f64 {
        if self.total_rounds == 0 {
            0.0
        } else {
            self.win_rounds / self.total_rounds as f64
        }
    }
}

/// Move-search engine for one Gomoku position.
///
/// Construct it from the host's grid, ask for a move, throw it away. The
/// grid uses 0 for empty, 1 for black and 2 for white cells; `stone_id`
/// names the side the engine plays.
#[derive(Debug)]
pub struct MctsEngine {
    searcher: MctsSearcher,
    player: Stone,
}

impl MctsEngine {
    /// Create an engine for `grid` with `stone_id` (1 or 2) to move.
    pub fn new(grid: &[Vec<u8>], stone_id: u8) -> Result<Self> {
        let (board, player) = Self::parse_inputs(grid, stone_id)?;
        Ok(Self {
            searcher: MctsSearcher::new(board, player),
            player,
        })
    }

    /// Like [`MctsEngine::new`] but with a fixed random seed, for
    /// reproducible searches.
    pub fn with_seed(grid: &[Vec<u8>], stone_id: u8, seed: u64) -> Result<Self> {
        let (board, player) = Self::parse_inputs(grid, stone_id)?;
        Ok(Self {
            searcher: MctsSearcher::with_seed(board, player, seed),
            player,
        })
    }

    fn parse_inputs(grid: &[Vec<u8>], stone_id: u8) -> Result<(Board, Stone)> {
        let board = Board::from_grid(grid)?;
        let player = match Stone::from_id(stone_id) {
            Some(stone) if stone != Stone::Empty => stone,
            _ => return Err(EngineError::InvalidStone(stone_id)),
        };
        Ok((board, player))
    }

    /// The numeric id of the side this engine plays.
    #[must_use]
    pub fn player(&self) -> u8 {
        self.player.to_id()
    }

    /// Switch the playout/expansion policy (near-place by default).
    pub fn set_playout_policy(&mut self, policy: PlayoutPolicy) {
        self.searcher.set_playout_policy(policy);
    }

    #[must_use]
    pub fn playout_policy(&self) -> PlayoutPolicy {
        self.searcher.playout_policy()
    }

    /// Set the Chebyshev radius of the near-place policy.
    pub fn set_near_distance(&mut self, distance: u8) {
        self.searcher.set_near_distance(distance);
    }

    #[must_use]
    pub fn near_distance(&self) -> u8 {
        self.searcher.near_distance()
    }

    /// Search with the given iteration count and return `(row, col)`.
    ///
    /// `iterations` must be positive.
    pub fn search_move(&mut self, iterations: u32) -> Result<(usize, usize)> {
        let pos = self.searcher.search_move(iterations)?;
        Ok((pos.row, pos.col))
    }

    /// Search with [`DEFAULT_ITERATIONS`].
    pub fn search_move_default(&mut self) -> Result<(usize, usize)> {
        self.search_move(DEFAULT_ITERATIONS)
    }

    /// Search and return the move together with its statistics.
    pub fn search_move_with_stats(&mut self, iterations: u32) -> Result<SearchOutcome> {
        let started = Instant::now();
        let pos = self.searcher.search_move(iterations)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        // The empty-board opening shortcut leaves the root childless; the
        // chosen move then reports zero rounds.
        let tree = self.searcher.tree();
        let root = tree.root();
        let (win_rounds, total_rounds) = tree
            .get(root)
            .children
            .iter()
            .map(|&child| tree.get(child))
            .find(|node| node.from_move == Some(pos))
            .map(|node| (node.win_rounds, node.total_rounds))
            .unwrap_or((0.0, 0));

        let outcome = SearchOutcome {
            best_move: (pos.row, pos.col),
            win_rounds,
            total_rounds,
            iterations,
            node_count: tree.node_count(),
            tree_depth: tree.depth(),
            elapsed_ms,
        };
        debug!(
            "move ({}, {}) after {} iterations in {} ms, ratio {:.3}",
            outcome.best_move.0,
            outcome.best_move.1,
            iterations,
            outcome.elapsed_ms,
            outcome.win_ratio()
        );
        Ok(outcome)
    }

    /// Total number of nodes in the search tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.searcher.node_count()
    }

    /// Depth of the search tree; a lone root counts as 1.
    #[must_use]
    pub fn tree_depth(&self) -> usize {
        self.searcher.tree_depth()
    }

    /// Node count per tree depth, root level first.
    #[must_use]
    pub fn depth_node_counts(&self) -> Vec<usize> {
        self.searcher.depth_node_counts()
    }
}
