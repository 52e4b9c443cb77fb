//! MCTS tree node representation.
//!
//! Each node stands for the history of actions that leads to it from the
//! root. Nodes record every rollout outcome that passed through them; the
//! mean of those outcomes drives both UCB1 selection and the final choice.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<A> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<A>,

    /// Children in the order they were expanded. Action keys are unique.
    pub children: Vec<(A, NodeId)>,

    /// Every outcome backpropagated through this node, oldest first
    pub results: Vec<f64>,

    /// Number of recorded outcomes; always equals `results.len()`
    pub visit_count: u32,
}

impl<A> MctsNode<A> {
    /// Create a new root node.
    pub fn new_root() -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            children: Vec::new(),
            results: Vec::new(),
            visit_count: 0,
        }
    }

    /// Create a new child node reached from `parent` via `action`.
    pub fn new_child(parent: NodeId, action: A) -> Self {
        Self {
            parent,
            action: Some(action),
            children: Vec::new(),
            results: Vec::new(),
            visit_count: 0,
        }
    }

    /// Record one outcome at this node.
    #[inline]
    pub fn record(&mut self, result: f64) {
        self.results.push(result);
        self.visit_count += 1;
    }

    /// Arithmetic mean of recorded outcomes.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.results.iter().sum::<f64>() / self.results.len() as f64
        }
    }

    /// UCB1 score of this node as a child of a parent whose visit count has
    /// logarithm `parent_visits_ln`.
    ///
    /// UCB1 = mean + c * sqrt(ln(N_parent) / N_child)
    ///
    /// An unvisited child scores `+inf`, so every child is tried once before
    /// any exploitation comparison matters.
    #[inline]
    pub fn ucb1_score(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let bonus = (parent_visits_ln / self.visit_count as f64).sqrt();
        self.mean_value() + exploration * bonus
    }

    /// Check if this is the root node.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this node has no expanded children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<A: PartialEq> MctsNode<A> {
    /// Look up the child reached via `action`.
    pub fn child(&self, action: &A) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, id)| *id)
    }

    /// Whether `action` has already been expanded from this node.
    #[inline]
    pub fn has_child(&self, action: &A) -> bool {
        self.child(action).is_some()
    }
}
