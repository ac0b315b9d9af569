//! The four-phase MCTS loop
//!
//! Each iteration selects a leaf by UCT descent, expands it, rolls the new
//! position out with the configured playout policy and backpropagates the
//! result. After the requested number of iterations the most-visited child
//! of the root is the decision; visit count is more robust than raw win
//! rate as a final criterion.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::{Board, Pos, Stone};
use crate::rules::{outcome_at, Outcome};
use crate::{EngineError, Result};

use super::node::{NodeId, Tree};
use super::playout::{
    candidate_moves, run_playout, PlayoutPolicy, PlayoutResult, DEFAULT_NEAR_DISTANCE,
};

/// Monte Carlo tree searcher for a single position.
///
/// Owns the search tree and the random source. The tree persists across
/// calls to [`MctsSearcher::search_move`] on the same instance, but there
/// is no contract of reuse between moves: a fresh position gets a fresh
/// searcher.
#[derive(Debug)]
pub struct MctsSearcher {
    tree: Tree,
    player: Stone,
    playout_policy: PlayoutPolicy,
    near_distance: u8,
    rng: StdRng,
}

impl MctsSearcher {
    /// Create a searcher for the given position with `player` to move.
    pub fn new(board: Board, player: Stone) -> Self {
        Self::with_rng(board, player, StdRng::from_entropy())
    }

    /// Create a searcher with a fixed seed for reproducible searches.
    pub fn with_seed(board: Board, player: Stone, seed: u64) -> Self {
        Self::with_rng(board, player, StdRng::seed_from_u64(seed))
    }

    fn with_rng(board: Board, player: Stone, rng: StdRng) -> Self {
        // The root pretends the opponent just moved, so expansion places
        // `player` stones at depth 1.
        Self {
            tree: Tree::new(board, player.opponent()),
            player,
            playout_policy: PlayoutPolicy::default(),
            near_distance: DEFAULT_NEAR_DISTANCE,
            rng,
        }
    }

    /// The side this searcher finds moves for.
    #[must_use]
    pub fn player(&self) -> Stone {
        self.player
    }

    /// Switch the playout/expansion policy.
    pub fn set_playout_policy(&mut self, policy: PlayoutPolicy) {
        self.playout_policy = policy;
    }

    #[must_use]
    pub fn playout_policy(&self) -> PlayoutPolicy {
        self.playout_policy
    }

    /// Set the Chebyshev radius used by the near-place policy.
    pub fn set_near_distance(&mut self, distance: u8) {
        self.near_distance = distance;
    }

    #[must_use]
    pub fn near_distance(&self) -> u8 {
        self.near_distance
    }

    /// Read-only view of the search tree.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Run `iterations` rounds of the search and return the best move.
    ///
    /// `iterations` must be positive: a zero-round search grows no tree
    /// and has no decision to read out.
    ///
    /// An empty board short-circuits to the center cell without running
    /// any simulation. Otherwise the decision is the most-visited root
    /// child; a root with no children after the loop means the starting
    /// position had no legal continuation and surfaces as
    /// [`EngineError::NoLegalMove`].
    pub fn search_move(&mut self, iterations: u32) -> Result<Pos> {
        debug_assert!(iterations > 0, "iterations must be positive");
        let root = self.tree.root();
        if self.tree.get(root).state.is_board_empty() {
            let center = self.tree.get(root).state.center();
            debug!("empty board, opening at center ({}, {})", center.row, center.col);
            return Ok(center);
        }

        for _ in 0..iterations {
            self.iterate();
        }

        let best = self
            .tree
            .most_visited_child(root)
            .ok_or(EngineError::NoLegalMove)?;
        let node = self.tree.get(best);
        let pos = node.from_move.ok_or(EngineError::NoLegalMove)?;
        debug!(
            "win ratio: {}/{} = {:.3}, tree nodes: {}",
            node.win_rounds,
            node.total_rounds,
            node.win_rounds / node.total_rounds.max(1) as f64,
            self.tree.node_count()
        );
        Ok(pos)
    }

    /// One complete selection → expansion → rollout → backpropagation
    /// round.
    fn iterate(&mut self) {
        let Some(leaf) = self.selection() else {
            // Iteration absorbed by a terminal leaf (or a position with
            // no candidates); statistics were already propagated.
            return;
        };

        let node = self.tree.get(leaf);
        let mover = node.mover;
        if let Some(pos) = node.from_move {
            match outcome_at(&node.state, pos) {
                Outcome::Win => {
                    // The freshly placed stone already ends the game.
                    self.tree.backpropagate(leaf, mover, PlayoutResult::Win);
                    return;
                }
                Outcome::Draw => {
                    self.tree.backpropagate(leaf, mover, PlayoutResult::Draw);
                    return;
                }
                Outcome::Ongoing => {}
            }
        }

        // Roll out from whoever moves next after the leaf; the result is
        // inverted to the leaf mover's perspective before propagation.
        let result = run_playout(
            self.playout_policy,
            &self.tree.get(leaf).state,
            mover.opponent(),
            self.near_distance,
            &mut self.rng,
        );
        self.tree.backpropagate(leaf, mover, result.invert());
    }

    /// Descend to a leaf and expand it.
    ///
    /// Returns the first freshly created child, so the iteration doing the
    /// expansion also runs one simulation immediately. Returns `None` when
    /// the descended-to leaf is already terminal (its result is
    /// backpropagated here) or when expansion finds no candidates.
    fn selection(&mut self) -> Option<NodeId> {
        let leaf = self.tree.select_leaf();
        let node = self.tree.get(leaf);
        let mover = node.mover;

        // The root carries no move and is never treated as terminal.
        if let Some(pos) = node.from_move {
            match outcome_at(&node.state, pos) {
                Outcome::Win => {
                    self.tree.backpropagate(leaf, mover, PlayoutResult::Win);
                    return None;
                }
                Outcome::Draw => {
                    self.tree.backpropagate(leaf, mover, PlayoutResult::Draw);
                    return None;
                }
                Outcome::Ongoing => {}
            }
        }
        self.expansion(leaf)
    }

    /// Populate `leaf` with one child per candidate cell, shuffle the
    /// children once and return the first of them.
    fn expansion(&mut self, leaf: NodeId) -> Option<NodeId> {
        let opponent = self.tree.get(leaf).mover.opponent();
        let candidates = candidate_moves(
            &self.tree.get(leaf).state,
            self.playout_policy,
            self.near_distance,
        );

        for pos in candidates {
            let mut state = self.tree.get(leaf).state.clone();
            state.place_stone(pos, opponent);
            self.tree.add_child(leaf, state, opponent, pos);
        }

        // Shuffled once: tie-breaking order among equal-priority siblings
        // stays random for the rest of the search.
        let rng = &mut self.rng;
        self.tree.get_mut(leaf).children.shuffle(rng);
        self.tree.get(leaf).children.first().copied()
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    /// Tree depth; a lone root counts as 1.
    #[must_use]
    pub fn tree_depth(&self) -> usize {
        self.tree.depth()
    }

    /// Node count per depth, root at index 0.
    #[must_use]
    pub fn depth_node_counts(&self) -> Vec<usize> {
        self.tree.depth_node_counts()
    }
}
