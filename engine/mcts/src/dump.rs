//! Debug view of a search tree.
//!
//! `MctsTree::dump` flattens the arena into nested `TreeDump` values that can
//! be logged, rendered as indented text or serialized to JSON.

use std::fmt::{self, Debug, Write as _};

use serde::Serialize;

use crate::node::NodeId;
use crate::tree::MctsTree;

/// One node of a dumped tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeDump {
    /// `Debug` rendering of the incoming action (None at the root)
    pub action: Option<String>,
    pub visits: u32,
    pub mean: f64,
    pub children: Vec<TreeDump>,
}

impl<A: Clone + PartialEq + Debug> MctsTree<A> {
    /// Snapshot the tree, stopping below `max_depth` levels when given.
    ///
    /// Children are always allocated after their parent, so walking the arena
    /// backwards finishes every subtree before its parent is assembled.
    pub fn dump(&self, max_depth: Option<usize>) -> TreeDump {
        let arena = self.arena();

        let mut depths = vec![0usize; arena.len()];
        for (idx, node) in arena.iter().enumerate() {
            if node.parent.is_some() {
                depths[idx] = depths[node.parent.index()] + 1;
            }
        }

        let mut built: Vec<Option<TreeDump>> = vec![None; arena.len()];
        for idx in (0..arena.len()).rev() {
            if max_depth.is_some_and(|limit| depths[idx] > limit) {
                continue;
            }
            let node = &arena[idx];
            let children = node
                .children
                .iter()
                .filter_map(|(_, child_id)| built[child_id.index()].take())
                .collect();
            built[idx] = Some(TreeDump {
                action: node.action.as_ref().map(|action| format!("{:?}", action)),
                visits: node.visit_count,
                mean: node.mean_value(),
                children,
            });
        }

        built[NodeId(0).index()].take().unwrap_or(TreeDump {
            action: None,
            visits: 0,
            mean: 0.0,
            children: Vec::new(),
        })
    }
}

impl TreeDump {
    /// Number of nodes in this dump.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Indented text view, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let _ = writeln!(out, "{:indent$}{}", "", node, indent = depth * 2);
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

impl fmt::Display for TreeDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} visits={} mean={:.3}",
            self.action.as_deref().unwrap_or("root"),
            self.visits,
            self.mean
        )
    }
}
