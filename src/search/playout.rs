//! Playout (rollout) policies
//!
//! A playout finishes a game from a given position with uniformly random
//! moves and reports the outcome relative to the side that moved first.
//! Two policies are available:
//!
//! - [`PlayoutPolicy::Uniform`]: every empty cell is a candidate. The full
//!   list is built once and consumed through an in-place random-swap
//!   permutation, so each cell is drawn exactly once.
//! - [`PlayoutPolicy::NearPlace`]: only empty cells within a Chebyshev
//!   distance of an already-occupied cell are candidates, and each placed
//!   stone grows the frontier by its own empty neighborhood. This bounds
//!   the branching on large boards where far-away cells are strategically
//!   irrelevant, at the cost of never trying a distant move.
//!
//! The same candidate rules drive expansion in the search loop, keeping
//! both call sites symmetric.

use std::collections::HashSet;

use rand::Rng;

use crate::board::{Board, Pos, Stone};
use crate::rules::{outcome_at, Outcome};

/// Default Chebyshev radius for the near-place policy
pub const DEFAULT_NEAR_DISTANCE: u8 = 2;

/// Strategy used for rollout simulation and expansion candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayoutPolicy {
    /// Consider every empty cell
    Uniform,
    /// Consider only empty cells near existing stones
    #[default]
    NearPlace,
}

/// Outcome of a playout, relative to the side given to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoutResult {
    Draw,
    Win,
    Loss,
}

impl PlayoutResult {
    /// The same outcome seen from the other side.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            PlayoutResult::Draw => PlayoutResult::Draw,
            PlayoutResult::Win => PlayoutResult::Loss,
            PlayoutResult::Loss => PlayoutResult::Win,
        }
    }
}

/// Run the configured playout from `board` with `to_move` placing first.
pub fn run_playout<R: Rng>(
    policy: PlayoutPolicy,
    board: &Board,
    to_move: Stone,
    distance: u8,
    rng: &mut R,
) -> PlayoutResult {
    match policy {
        PlayoutPolicy::Uniform => uniform_playout(board, to_move, rng),
        PlayoutPolicy::NearPlace => near_place_playout(board, to_move, distance, rng),
    }
}

/// Expansion candidates under the given policy.
///
/// Mirrors the rollout candidate rules: all empty cells for
/// [`PlayoutPolicy::Uniform`], the near-place set for
/// [`PlayoutPolicy::NearPlace`].
pub fn candidate_moves(board: &Board, policy: PlayoutPolicy, distance: u8) -> Vec<Pos> {
    match policy {
        PlayoutPolicy::Uniform => board.empty_cells(),
        PlayoutPolicy::NearPlace => near_candidates(board, distance),
    }
}

/// Empty cells within Chebyshev `distance` of some occupied cell.
///
/// On an entirely empty board the neighborhood of the center is used
/// instead, so the opening always has candidates.
pub fn near_candidates(board: &Board, distance: u8) -> Vec<Pos> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    if board.is_board_empty() {
        push_empty_neighborhood(board, board.center(), distance, &mut seen, &mut candidates);
        // The center itself is empty and belongs to its own neighborhood.
        if seen.insert(board.center()) {
            candidates.push(board.center());
        }
        return candidates;
    }

    for row in 0..board.size() {
        for col in 0..board.size() {
            let pos = Pos::new(row, col);
            if !board.is_empty(pos) {
                push_empty_neighborhood(board, pos, distance, &mut seen, &mut candidates);
            }
        }
    }
    candidates
}

/// Add every empty cell within `distance` of `around` that has not been
/// seen yet to the candidate pool.
fn push_empty_neighborhood(
    board: &Board,
    around: Pos,
    distance: u8,
    seen: &mut HashSet<Pos>,
    pool: &mut Vec<Pos>,
) {
    let d = distance as i32;
    for dr in -d..=d {
        for dc in -d..=d {
            if dr == 0 && dc == 0 {
                continue;
            }
            let r = around.row as i32 + dr;
            let c = around.col as i32 + dc;
            if !board.in_bounds(r, c) {
                continue;
            }
            let pos = Pos::new(r as usize, c as usize);
            if board.is_empty(pos) && seen.insert(pos) {
                pool.push(pos);
            }
        }
    }
}

/// Uniform random playout over all empty cells.
///
/// The empty-cell list is computed once; each step swaps a random
/// unconsumed cell to the front of the tail and places there, which is a
/// lazily evaluated Fisher-Yates permutation. A win or draw detected at
/// the placed cell ends the simulation; exhausting the list without a
/// winner is a draw.
pub fn uniform_playout<R: Rng>(board: &Board, to_move: Stone, rng: &mut R) -> PlayoutResult {
    let mut board = board.clone();
    let mut pool = board.empty_cells();
    let mut cur = to_move;

    for step in 0..pool.len() {
        let pick = rng.gen_range(step..pool.len());
        pool.swap(step, pick);
        let pos = pool[step];

        board.place_stone(pos, cur);
        match outcome_at(&board, pos) {
            Outcome::Win => {
                return if cur == to_move {
                    PlayoutResult::Win
                } else {
                    PlayoutResult::Loss
                }
            }
            Outcome::Draw => return PlayoutResult::Draw,
            Outcome::Ongoing => {}
        }
        cur = cur.opponent();
    }
    PlayoutResult::Draw
}

/// Near-place random playout.
///
/// The candidate pool starts as the near-place set of the starting
/// position and grows as play proceeds: after each placement, the placed
/// cell's empty neighborhood joins the pool (deduplicated through a
/// seen-set). Cells are drawn uniformly from the unconsumed tail; running
/// out of candidates without a winner is a draw.
pub fn near_place_playout<R: Rng>(
    board: &Board,
    to_move: Stone,
    distance: u8,
    rng: &mut R,
) -> PlayoutResult {
    let mut board = board.clone();
    let mut pool = near_candidates(&board, distance);
    let mut seen: HashSet<Pos> = pool.iter().copied().collect();
    let mut cur = to_move;

    let mut step = 0;
    while step < pool.len() {
        let pick = rng.gen_range(step..pool.len());
        pool.swap(step, pick);
        let pos = pool[step];
        step += 1;

        board.place_stone(pos, cur);
        match outcome_at(&board, pos) {
            Outcome::Win => {
                return if cur == to_move {
                    PlayoutResult::Win
                } else {
                    PlayoutResult::Loss
                }
            }
            Outcome::Draw => return PlayoutResult::Draw,
            Outcome::Ongoing => {}
        }
        push_empty_neighborhood(&board, pos, distance, &mut seen, &mut pool);
        cur = cur.opponent();
    }
    PlayoutResult::Draw
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// 7x7 board with exactly two empty cells, (0,4) and (2,4), each of
    /// which completes a black five. The filler rows use a BBWW pattern
    /// shifted two cells per row, which admits no five anywhere.
    fn double_threat_board() -> Board {
        let mut board = Board::new(7);
        for r in 0..7 {
            for c in 0..7 {
                let stone = if (c + 2 * r) % 4 < 2 {
                    Stone::Black
                } else {
                    Stone::White
                };
                board.place_stone(Pos::new(r, c), stone);
            }
        }
        for c in 0..4 {
            board.place_stone(Pos::new(0, c), Stone::Black);
            board.place_stone(Pos::new(2, c), Stone::Black);
        }
        board.place_stone(Pos::new(0, 4), Stone::Empty);
        board.place_stone(Pos::new(2, 4), Stone::Empty);
        board
    }

    #[test]
    fn test_invert() {
        assert_eq!(PlayoutResult::Win.invert(), PlayoutResult::Loss);
        assert_eq!(PlayoutResult::Loss.invert(), PlayoutResult::Win);
        assert_eq!(PlayoutResult::Draw.invert(), PlayoutResult::Draw);
    }

    #[test]
    fn test_double_threat_board_shape() {
        let board = double_threat_board();
        assert_eq!(board.empty_cells(), vec![Pos::new(0, 4), Pos::new(2, 4)]);
        assert!(!crate::rules::has_five(&board, Stone::Black));
        assert!(!crate::rules::has_five(&board, Stone::White));
    }

    #[test]
    fn test_uniform_playout_black_wins_immediately() {
        // Black moves first and either empty cell completes a five.
        let board = double_threat_board();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = uniform_playout(&board, Stone::Black, &mut rng);
            assert_eq!(result, PlayoutResult::Win);
        }
    }

    #[test]
    fn test_uniform_playout_white_always_loses() {
        // White can block only one of the two winning cells.
        let board = double_threat_board();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = uniform_playout(&board, Stone::White, &mut rng);
            assert_eq!(result, PlayoutResult::Loss);
        }
    }

    #[test]
    fn test_near_place_playout_forced_outcomes() {
        let board = double_threat_board();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                near_place_playout(&board, Stone::Black, 2, &mut rng),
                PlayoutResult::Win
            );
            assert_eq!(
                near_place_playout(&board, Stone::White, 2, &mut rng),
                PlayoutResult::Loss
            );
        }
    }

    #[test]
    fn test_playout_on_full_board_is_draw() {
        let mut board = double_threat_board();
        board.place_stone(Pos::new(0, 4), Stone::White);
        board.place_stone(Pos::new(2, 4), Stone::White);
        assert_eq!(
            uniform_playout(&board, Stone::Black, &mut rng()),
            PlayoutResult::Draw
        );
        assert_eq!(
            near_place_playout(&board, Stone::Black, 2, &mut rng()),
            PlayoutResult::Draw
        );
    }

    #[test]
    fn test_playout_exhaustion_without_five_is_draw() {
        // 3x3 board can never host a five; filling it ends in a draw.
        let mut board = Board::new(3);
        board.place_stone(Pos::new(1, 1), Stone::Black);
        assert_eq!(
            uniform_playout(&board, Stone::White, &mut rng()),
            PlayoutResult::Draw
        );
        assert_eq!(
            near_place_playout(&board, Stone::White, 2, &mut rng()),
            PlayoutResult::Draw
        );
    }

    #[test]
    fn test_near_candidates_single_stone() {
        let mut board = Board::new(11);
        board.place_stone(Pos::new(5, 5), Stone::Black);

        let candidates = near_candidates(&board, 2);
        // Full 5x5 neighborhood minus the occupied center.
        assert_eq!(candidates.len(), 24);
        for pos in &candidates {
            assert!(board.is_empty(*pos));
            assert!(pos.chebyshev(Pos::new(5, 5)) <= 2);
        }
    }

    #[test]
    fn test_near_candidates_distance_one() {
        let mut board = Board::new(11);
        board.place_stone(Pos::new(5, 5), Stone::Black);
        assert_eq!(near_candidates(&board, 1).len(), 8);
    }

    #[test]
    fn test_near_candidates_clipped_at_edge() {
        let mut board = Board::new(11);
        board.place_stone(Pos::new(0, 0), Stone::White);
        let candidates = near_candidates(&board, 2);
        // 3x3 corner block minus the stone itself.
        assert_eq!(candidates.len(), 8);
    }

    #[test]
    fn test_near_candidates_empty_board_centered() {
        let board = Board::new(11);
        let candidates = near_candidates(&board, 2);
        // 5x5 neighborhood of the center, center included.
        assert_eq!(candidates.len(), 25);
        for pos in &candidates {
            assert!(pos.chebyshev(board.center()) <= 2);
        }
    }

    #[test]
    fn test_near_candidates_no_duplicates() {
        let mut board = Board::new(11);
        board.place_stone(Pos::new(5, 5), Stone::Black);
        board.place_stone(Pos::new(5, 6), Stone::White);

        let candidates = near_candidates(&board, 2);
        let unique: HashSet<Pos> = candidates.iter().copied().collect();
        assert_eq!(unique.len(), candidates.len());
    }

    #[test]
    fn test_candidate_moves_mirrors_policies() {
        let mut board = Board::new(11);
        board.place_stone(Pos::new(5, 5), Stone::Black);

        assert_eq!(
            candidate_moves(&board, PlayoutPolicy::Uniform, 2).len(),
            120
        );
        assert_eq!(
            candidate_moves(&board, PlayoutPolicy::NearPlace, 2).len(),
            24
        );
    }
}
