//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for node storage. Nodes are stored in a
//! contiguous Vec and referenced by NodeId indices, so parent links are plain
//! indices rather than owning pointers. A tree lives for a single decision
//! and is dropped afterwards.

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<A> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<A>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,

    /// UCB1 exploration constant shared by every node in the tree
    exploration: f64,
}

impl<A: Clone + PartialEq> MctsTree<A> {
    /// Create a new tree holding only a root node.
    pub fn new(exploration: f64) -> Self {
        Self {
            nodes: vec![MctsNode::new_root()],
            root: NodeId(0),
            exploration,
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The exploration constant this tree was built with.
    #[inline]
    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<A> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<A> {
        &mut self.nodes[id.index()]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<A>] {
        &self.nodes
    }

    /// Child of `node_id` reached via `action`, if expanded.
    #[inline]
    pub fn child(&self, node_id: NodeId, action: &A) -> Option<NodeId> {
        self.get(node_id).child(action)
    }

    /// Legal actions that have no child under `node_id` yet, in `legal` order.
    pub fn unexplored(&self, node_id: NodeId, legal: &[A]) -> Vec<A> {
        let node = self.get(node_id);
        legal
            .iter()
            .filter(|action| !node.has_child(action))
            .cloned()
            .collect()
    }

    /// Add a child to a parent node and return its NodeId.
    ///
    /// If `action` was already expanded from `parent_id` the existing child
    /// is returned instead, so child keys stay unique.
    pub fn add_child(&mut self, parent_id: NodeId, action: A) -> NodeId {
        if let Some(existing) = self.child(parent_id, &action) {
            return existing;
        }

        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(MctsNode::new_child(parent_id, action.clone()));
        self.get_mut(parent_id).children.push((action, child_id));
        child_id
    }

    /// UCB1 score of `child_id` under `parent_id`.
    pub fn ucb1(&self, parent_id: NodeId, child_id: NodeId) -> f64 {
        let parent_visits_ln = (self.get(parent_id).visit_count.max(1) as f64).ln();
        self.get(child_id)
            .ucb1_score(parent_visits_ln, self.exploration)
    }

    /// Select the child of `node_id` with the highest UCB1 score.
    ///
    /// Ties go to the child expanded first. Returns None for a leaf.
    pub fn select_child(&self, node_id: NodeId) -> Option<(A, NodeId)> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let parent_visits_ln = (node.visit_count.max(1) as f64).ln();

        let mut best: Option<(&A, NodeId, f64)> = None;
        for (action, child_id) in &node.children {
            let score = self
                .get(*child_id)
                .ucb1_score(parent_visits_ln, self.exploration);
            match best {
                Some((_, _, best_score)) if score <= best_score => {}
                _ => best = Some((action, *child_id, score)),
            }
        }

        best.map(|(action, id, _)| (action.clone(), id))
    }

    /// Record `value` at `leaf_id` and every ancestor up to the root.
    ///
    /// Walks parent links in a loop, so stack usage does not grow with depth.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f64) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.record(value);
            current_id = node.parent;
        }
    }

    /// Best action at the root among `legal`: the explored child with the
    /// highest mean outcome. Ties go to the action listed first in `legal`.
    ///
    /// Returns None when no legal action has a child with a recorded result.
    pub fn best_action(&self, legal: &[A]) -> Option<(A, NodeId)> {
        let root = self.get(self.root);
        let mut best: Option<(&A, NodeId, f64)> = None;

        for action in legal {
            let Some(child_id) = root.child(action) else {
                continue;
            };
            let child = self.get(child_id);
            if child.results.is_empty() {
                continue;
            }
            let mean = child.mean_value();
            match best {
                Some((_, _, best_mean)) if mean <= best_mean => {}
                _ => best = Some((action, child_id, mean)),
            }
        }

        best.map(|(action, id, _)| (action.clone(), id))
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            root_children: root.children.len(),
            max_depth: self.compute_max_depth(),
        }
    }

    /// Depth of the deepest node.
    ///
    /// Children are always allocated after their parent, so one forward pass
    /// over the arena sees every parent depth before it is needed.
    fn compute_max_depth(&self) -> u32 {
        let mut depths = vec![0u32; self.nodes.len()];
        let mut max_depth = 0;

        for (idx, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depths[idx] = depths[node.parent.index()] + 1;
                max_depth = max_depth.max(depths[idx]);
            }
        }

        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub root_children: usize,
    pub max_depth: u32,
}
