//! Monte Carlo Tree Search (MCTS) over card-battle style games.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` Game trait.
//!
//! # Overview
//!
//! MCTS builds a search tree by running iterations. Each iteration consists
//! of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1 to balance exploration and
//!    exploitation, on a freshly sampled snapshot of the root state
//! 2. **Expansion**: At the first node with an unexplored legal action, add
//!    exactly one child for a uniformly chosen unexplored action
//! 3. **Rollout**: Play the game to the end with a rollout policy
//!    (uniform-random or greedy) and score the final state
//! 4. **Backpropagation**: Record the score at the new child and every
//!    ancestor up to the root
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{run_mcts, MctsConfig};
//! use games_cardbattle::{CardBattle, Scenario};
//! use rand_chacha::ChaCha20Rng;
//! use rand::SeedableRng;
//!
//! let game = CardBattle::new(Scenario::Starter);
//! let state = game.new_battle(42);
//!
//! let config = MctsConfig::default().with_iterations(200);
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(&game, config, &state, &mut rng).unwrap();
//!
//! println!("Best action: {:?}", result.action);
//! println!("Mean outcome: {}", result.value);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `iterations`: Number of iterations per decision (default: 100)
//! - `exploration`: UCB1 exploration constant (default: 0.5)
//! - `rollout`: Rollout policy, random or greedy
//! - `max_rollout_depth`: Cap on rollout length (0 = until terminal)
//! - `time_limit`: Optional wall-clock budget, checked between iterations
//!
//! # Architecture
//!
//! ```text
//! +--------------------------------------------------------+
//! |                      MctsSearch                        |
//! +--------------------------------------------------------+
//! |  +-------------+  +-------------+  +----------------+  |
//! |  |  MctsTree   |  |    Game     |  | RolloutPolicy  |  |
//! |  |  (arena)    |  | (adapter)   |  | uniform/greedy |  |
//! |  +------+------+  +------+------+  +-------+--------+  |
//! |         |                |                 |           |
//! |         v                v                 v           |
//! |  +--------------------------------------------------+  |
//! |  |     select -> expand -> rollout -> backpropagate |  |
//! |  +--------------------------------------------------+  |
//! +--------------------------------------------------------+
//! ```

pub mod config;
pub mod dump;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

#[cfg(test)]
mod test_games;

// Re-export main types
pub use config::{MctsConfig, RolloutKind, ScoreTransform};
pub use dump::TreeDump;
pub use node::{MctsNode, NodeId};
pub use rollout::{GreedyRollout, Rollout, RolloutPolicy, UniformRollout};
pub use search::{
    run_mcts, IterationOutcome, MctsSearch, SearchError, SearchResult, SearchStats,
};
pub use tree::{MctsTree, TreeStats};
