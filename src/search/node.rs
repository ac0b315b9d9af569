//! MCTS tree with arena allocation
//!
//! Nodes are stored in a contiguous `Vec` and referenced by `NodeId`
//! indices. The parent link is a plain index: it observes the ancestor for
//! upward statistics propagation but owns nothing, so subtrees cannot form
//! ownership cycles and the whole tree is freed with the arena.

use crate::board::{Board, Pos, Stone};

use super::playout::PlayoutResult;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the search tree: one reachable board configuration.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node index (`None` for root)
    pub parent: Option<NodeId>,

    /// The stone that was placed to produce `state` from the parent.
    /// The root holds the opponent of the searching player, since no move
    /// has been made yet.
    pub mover: Stone,

    /// The cell placed to reach this state (`None` for root)
    pub from_move: Option<Pos>,

    /// Board snapshot at this node (owned copy, never aliased)
    pub state: Board,

    /// Child indices, populated once at expansion time
    pub children: Vec<NodeId>,

    /// Accumulated fractional win credit (draws contribute 0.5)
    pub win_rounds: f64,

    /// Number of simulations that have passed through this node
    pub total_rounds: u32,
}

impl Node {
    fn new(parent: Option<NodeId>, state: Board, mover: Stone, from_move: Option<Pos>) -> Self {
        Self {
            parent,
            mover,
            from_move,
            state,
            children: Vec::new(),
            win_rounds: 0.0,
            total_rounds: 0,
        }
    }

    /// UCT score of this node given its parent's total visit count.
    ///
    /// An unvisited node scores +infinity so that every fresh node is tried
    /// once before any visited sibling is revisited. Otherwise:
    /// `win_rounds/total_rounds + sqrt(2) * sqrt(ln(parent_total)/total_rounds)`.
    #[inline]
    pub fn exploit_priority(&self, parent_total: u32) -> f64 {
        if self.total_rounds == 0 {
            return f64::INFINITY;
        }
        let total = self.total_rounds as f64;
        let win_ratio = self.win_rounds / total;
        win_ratio + std::f64::consts::SQRT_2 * ((parent_total as f64).ln() / total).sqrt()
    }

    /// Fold one simulation result into this node's statistics.
    #[inline]
    fn update_rounds(&mut self, added_win_rounds: f64) {
        self.win_rounds += added_win_rounds;
        self.total_rounds += 1;
    }
}

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree whose root holds the given position.
    ///
    /// `root_mover` is the side treated as having "just moved" into the
    /// root position, i.e. the opponent of the searching player.
    pub fn new(state: Board, root_mover: Stone) -> Self {
        Self {
            nodes: vec![Node::new(None, state, root_mover, None)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Allocate a child of `parent` and link it in.
    pub fn add_child(&mut self, parent: NodeId, state: Board, mover: Stone, from_move: Pos) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(Node::new(Some(parent), state, mover, Some(from_move)));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Descend from the root to a leaf, choosing at every node the child
    /// with the highest exploit priority.
    ///
    /// The first child attaining the maximum wins ties; children were
    /// shuffled once at expansion time, so exploration order among equal
    /// siblings is effectively random.
    pub fn select_leaf(&self) -> NodeId {
        let mut cur = self.root;
        loop {
            let node = self.get(cur);
            if node.children.is_empty() {
                return cur;
            }
            let parent_total = node.total_rounds;
            let mut best = node.children[0];
            let mut best_priority = self.get(best).exploit_priority(parent_total);
            for &child in &node.children[1..] {
                let priority = self.get(child).exploit_priority(parent_total);
                if priority > best_priority {
                    best = child;
                    best_priority = priority;
                }
            }
            cur = best;
        }
    }

    /// Propagate a simulation result from `from` up to the root inclusive.
    ///
    /// `result` is relative to `subject`. Every visited ancestor counts one
    /// more round; win credit goes to ancestors whose own mover is the
    /// winning side, and draws credit 0.5 at every ply.
    pub fn backpropagate(&mut self, from: NodeId, subject: Stone, result: PlayoutResult) {
        let mut cur = Some(from);
        while let Some(id) = cur {
            let node = self.get_mut(id);
            let credit = match result {
                PlayoutResult::Draw => 0.5,
                PlayoutResult::Win => {
                    if node.mover == subject {
                        1.0
                    } else {
                        0.0
                    }
                }
                PlayoutResult::Loss => {
                    if node.mover == subject {
                        0.0
                    } else {
                        1.0
                    }
                }
            };
            node.update_rounds(credit);
            cur = node.parent;
        }
    }

    /// The child of `of` with the most simulations, ties broken by the
    /// first encountered in child order. `None` if `of` has no children.
    pub fn most_visited_child(&self, of: NodeId) -> Option<NodeId> {
        let node = self.get(of);
        let mut best: Option<NodeId> = None;
        let mut best_rounds = 0u32;
        for &child in &node.children {
            let rounds = self.get(child).total_rounds;
            if best.is_none() || rounds > best_rounds {
                best = Some(child);
                best_rounds = rounds;
            }
        }
        best
    }

    /// Iterate over every node in the arena.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Total number of nodes reachable from the root.
    ///
    /// Computed by an explicit work-stack traversal (not cached, and no
    /// recursion that could overflow on deep trees).
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend_from_slice(&self.get(id).children);
        }
        count
    }

    /// Tree depth; the root alone counts as depth 1.
    pub fn depth(&self) -> usize {
        self.depth_node_counts().len()
    }

    /// Node count per depth level, root at index 0.
    ///
    /// The sum over all levels equals [`Tree::node_count`], and the length
    /// equals [`Tree::depth`].
    pub fn depth_node_counts(&self) -> Vec<usize> {
        let mut counts: Vec<usize> = Vec::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            if depth >= counts.len() {
                counts.resize(depth + 1, 0);
            }
            counts[depth] += 1;
            for &child in &self.get(id).children {
                stack.push((child, depth + 1));
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_board() -> Board {
        Board::new(5)
    }

    fn chain_tree() -> (Tree, NodeId, NodeId) {
        // root(White) -> child(Black) -> grandchild(White)
        let mut tree = Tree::new(tiny_board(), Stone::White);
        let child = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(1, 1));
        let grandchild = tree.add_child(child, tiny_board(), Stone::White, Pos::new(2, 2));
        (tree, child, grandchild)
    }

    #[test]
    fn test_new_tree() {
        let tree = Tree::new(tiny_board(), Stone::White);
        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert!(root.from_move.is_none());
        assert_eq!(root.mover, Stone::White);
        assert_eq!(root.total_rounds, 0);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_add_child_links_both_ways() {
        let mut tree = Tree::new(tiny_board(), Stone::White);
        let child = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(0, 3));

        assert_eq!(tree.get(tree.root()).children, vec![child]);
        assert_eq!(tree.get(child).parent, Some(tree.root()));
        assert_eq!(tree.get(child).from_move, Some(Pos::new(0, 3)));
        assert_eq!(tree.get(child).mover, Stone::Black);
    }

    #[test]
    fn test_unvisited_priority_is_infinite() {
        let tree = Tree::new(tiny_board(), Stone::White);
        let root = tree.get(tree.root());
        assert_eq!(root.exploit_priority(10), f64::INFINITY);
    }

    #[test]
    fn test_visited_priority_formula() {
        let mut tree = Tree::new(tiny_board(), Stone::White);
        let child = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(1, 1));
        let node = tree.get_mut(child);
        node.win_rounds = 3.0;
        node.total_rounds = 4;

        let expected = 0.75 + std::f64::consts::SQRT_2 * (100f64.ln() / 4.0).sqrt();
        let got = tree.get(child).exploit_priority(100);
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unvisited_child_selected_over_visited() {
        let mut tree = Tree::new(tiny_board(), Stone::White);
        let visited = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(1, 1));
        let fresh = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(2, 2));

        // All-win statistics still lose to an unvisited sibling.
        tree.get_mut(tree.root()).total_rounds = 8;
        let node = tree.get_mut(visited);
        node.total_rounds = 8;
        node.win_rounds = 8.0;

        assert_eq!(tree.select_leaf(), fresh);
    }

    #[test]
    fn test_selection_ties_break_first_in_order() {
        let mut tree = Tree::new(tiny_board(), Stone::White);
        let first = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(1, 1));
        let _second = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(2, 2));
        // Both unvisited: identical +inf priority, first in child order wins.
        assert_eq!(tree.select_leaf(), first);
    }

    #[test]
    fn test_backpropagate_win_credit_pattern() {
        let (mut tree, child, grandchild) = chain_tree();
        tree.backpropagate(grandchild, Stone::White, PlayoutResult::Win);

        // White movers (root, grandchild) get the credit; Black ply does not.
        assert_eq!(tree.get(grandchild).total_rounds, 1);
        assert_eq!(tree.get(grandchild).win_rounds, 1.0);
        assert_eq!(tree.get(child).total_rounds, 1);
        assert_eq!(tree.get(child).win_rounds, 0.0);
        assert_eq!(tree.get(tree.root()).total_rounds, 1);
        assert_eq!(tree.get(tree.root()).win_rounds, 1.0);
    }

    #[test]
    fn test_backpropagate_loss_flips_credit() {
        let (mut tree, child, grandchild) = chain_tree();
        tree.backpropagate(grandchild, Stone::White, PlayoutResult::Loss);

        assert_eq!(tree.get(grandchild).win_rounds, 0.0);
        assert_eq!(tree.get(child).win_rounds, 1.0);
        assert_eq!(tree.get(tree.root()).win_rounds, 0.0);
    }

    #[test]
    fn test_backpropagate_draw_half_credit_everywhere() {
        let (mut tree, child, grandchild) = chain_tree();
        tree.backpropagate(grandchild, Stone::White, PlayoutResult::Draw);

        for id in [grandchild, child, tree.root()] {
            assert_eq!(tree.get(id).total_rounds, 1);
            assert_eq!(tree.get(id).win_rounds, 0.5);
        }
    }

    #[test]
    fn test_backpropagate_from_middle_node() {
        let (mut tree, child, grandchild) = chain_tree();
        tree.backpropagate(child, Stone::Black, PlayoutResult::Win);

        // The subtree below the source is untouched.
        assert_eq!(tree.get(grandchild).total_rounds, 0);
        assert_eq!(tree.get(child).total_rounds, 1);
        assert_eq!(tree.get(child).win_rounds, 1.0);
        assert_eq!(tree.get(tree.root()).total_rounds, 1);
        assert_eq!(tree.get(tree.root()).win_rounds, 0.0);
    }

    #[test]
    fn test_most_visited_child() {
        let mut tree = Tree::new(tiny_board(), Stone::White);
        let a = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(0, 0));
        let b = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(0, 1));
        tree.get_mut(a).total_rounds = 3;
        tree.get_mut(b).total_rounds = 7;

        assert_eq!(tree.most_visited_child(tree.root()), Some(b));

        // Tie goes to the first child in order.
        tree.get_mut(a).total_rounds = 7;
        assert_eq!(tree.most_visited_child(tree.root()), Some(a));
    }

    #[test]
    fn test_most_visited_child_empty() {
        let tree = Tree::new(tiny_board(), Stone::White);
        assert_eq!(tree.most_visited_child(tree.root()), None);
    }

    #[test]
    fn test_introspection_counts_agree() {
        let mut tree = Tree::new(tiny_board(), Stone::White);
        let a = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(0, 0));
        let _b = tree.add_child(tree.root(), tiny_board(), Stone::Black, Pos::new(0, 1));
        let _aa = tree.add_child(a, tiny_board(), Stone::White, Pos::new(1, 0));

        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        let per_depth = tree.depth_node_counts();
        assert_eq!(per_depth, vec![1, 2, 1]);
        assert_eq!(per_depth.iter().sum::<usize>(), tree.node_count());
    }
}
