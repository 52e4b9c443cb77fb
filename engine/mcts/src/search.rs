//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm, one round per iteration:
//! 1. Selection: Descend the tree with UCB1 on a freshly sampled snapshot
//! 2. Expansion: Materialize one unexplored action as a new child
//! 3. Rollout: Play the game out from that child with the rollout policy
//! 4. Backpropagation: Record the score at the child and all its ancestors

use std::time::Instant;

use engine_core::{Game, GameError};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::rollout::{Rollout, RolloutPolicy};
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,
}

/// What a single iteration did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// A new child was created, rolled out and backpropagated
    Expanded,
    /// Descent reached a terminal state; nothing changed
    Terminal,
    /// The selected action was not legal in this iteration's snapshot
    Diverged,
    /// Descent ran out of legal moves on a non-terminal state
    Stalled,
    /// The game rejected a move during the rollout; nothing was recorded
    RolloutFailed,
}

/// Counters collected over one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Iterations started
    pub iterations: u32,
    /// Iterations that created a node
    pub expansions: u32,
    /// Iterations whose descent ended on a terminal state
    pub terminal_hits: u32,
    /// Iterations aborted because a selected action was illegal in the sample
    pub divergences: u32,
    /// Iterations that found neither moves nor children
    pub stalls: u32,
    /// Rollouts cut off by `max_rollout_depth`
    pub truncated_rollouts: u32,
    /// Iterations dropped because the game rejected a rollout move
    pub rollout_failures: u32,
    /// Actions played across all rollouts
    pub rollout_steps: u64,
    /// Wall-clock time of the whole search (microseconds)
    pub total_time_us: u64,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Best action to take
    pub action: A,

    /// Mean outcome recorded for `action` (0.0 if it was never explored)
    pub value: f64,

    /// Visits recorded for `action`
    pub visits: u32,

    /// Whether `action` was drawn at random because nothing was explored
    pub fallback: bool,

    /// Counters for this search
    pub stats: SearchStats,
}

/// MCTS search state.
///
/// Generic over the rollout policy; `MctsSearch::new` picks it from the
/// configuration.
pub struct MctsSearch<'a, G: Game, R: RolloutPolicy<G> = Rollout> {
    game: &'a G,
    config: MctsConfig,
    rollout: R,
    tree: MctsTree<G::Action>,
    stats: SearchStats,
}

impl<'a, G: Game> MctsSearch<'a, G, Rollout> {
    /// Create a search using the rollout strategy named in `config`.
    pub fn new(game: &'a G, config: MctsConfig) -> Self {
        let rollout = Rollout::from_kind(config.rollout);
        Self::with_rollout(game, config, rollout)
    }
}

impl<'a, G: Game, R: RolloutPolicy<G>> MctsSearch<'a, G, R> {
    /// Create a search with an explicit rollout policy.
    pub fn with_rollout(game: &'a G, config: MctsConfig, rollout: R) -> Self {
        let tree = MctsTree::new(config.exploration);
        Self {
            game,
            config,
            rollout,
            tree,
            stats: SearchStats::default(),
        }
    }

    /// Choose an action for `state`.
    ///
    /// Builds a fresh tree, runs the configured number of iterations (each on
    /// a newly sampled snapshot of `state`) and returns the explored legal
    /// action with the best mean outcome. Legal actions are always taken from
    /// `state` itself, never from a sample.
    pub fn run(
        &mut self,
        state: &G::State,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<G::Action>, SearchError> {
        let start = Instant::now();
        self.tree = MctsTree::new(self.config.exploration);
        self.stats = SearchStats::default();

        let legal = self.game.legal_actions(state);
        if legal.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        // Nothing to decide
        if legal.len() == 1 {
            self.stats.total_time_us = start.elapsed().as_micros() as u64;
            return Ok(SearchResult {
                action: legal[0].clone(),
                value: 0.0,
                visits: 0,
                fallback: false,
                stats: self.stats.clone(),
            });
        }

        for iteration in 0..self.config.iterations {
            if let Some(limit) = self.config.time_limit {
                if start.elapsed() >= limit {
                    debug!(iteration, "MCTS time limit reached");
                    break;
                }
            }

            let snapshot = self.game.sample_state(state, rng);
            let outcome = self.step(snapshot, rng);
            trace!(iteration, ?outcome, "MCTS iteration complete");
        }

        let (action, value, visits, fallback) = match self.tree.best_action(&legal) {
            Some((action, child_id)) => {
                let child = self.tree.get(child_id);
                (action, child.mean_value(), child.visit_count, false)
            }
            None => {
                warn!(
                    iterations = self.stats.iterations,
                    legal = legal.len(),
                    "MCTS explored no legal action, choosing at random"
                );
                let action = legal
                    .choose(rng)
                    .cloned()
                    .ok_or(SearchError::NoLegalMoves)?;
                (action, 0.0, 0, true)
            }
        };

        self.stats.total_time_us = start.elapsed().as_micros() as u64;
        let tree_stats = self.tree.stats();
        debug!(
            action = ?action,
            value,
            visits,
            fallback,
            iterations = self.stats.iterations,
            expansions = self.stats.expansions,
            divergences = self.stats.divergences,
            rollout_failures = self.stats.rollout_failures,
            nodes = tree_stats.total_nodes,
            depth = tree_stats.max_depth,
            time_us = self.stats.total_time_us,
            "MCTS search complete"
        );

        Ok(SearchResult {
            action,
            value,
            visits,
            fallback,
            stats: self.stats.clone(),
        })
    }

    /// Run one iteration from the root on `snapshot`.
    ///
    /// Descends while every legal action at the current node already has a
    /// child, advancing a private copy of the state along the way. The first
    /// node with an unexplored legal action is expanded. Descent stops without
    /// touching the tree when it reaches a terminal state or when the chosen
    /// child's action is not legal in this snapshot. A rollout the game
    /// rejects is dropped as well, so no node is left without results.
    pub fn step(&mut self, snapshot: G::State, rng: &mut ChaCha20Rng) -> IterationOutcome {
        self.stats.iterations += 1;
        let mut node_id = self.tree.root();
        let mut state = snapshot;

        loop {
            if self.game.is_terminal(&state) {
                self.stats.terminal_hits += 1;
                return IterationOutcome::Terminal;
            }

            let legal = self.game.legal_actions(&state);
            let unexplored = self.tree.unexplored(node_id, &legal);
            if !unexplored.is_empty() {
                return self.expand(node_id, &state, &unexplored, rng);
            }

            let Some((action, child_id)) = self.tree.select_child(node_id) else {
                self.stats.stalls += 1;
                return IterationOutcome::Stalled;
            };

            if !legal.contains(&action) {
                trace!(action = ?action, "selected action illegal in sampled state");
                self.stats.divergences += 1;
                return IterationOutcome::Diverged;
            }

            state = match self.game.apply_action(&state, &action) {
                Ok(next) => next,
                Err(err) => {
                    trace!(action = ?action, %err, "selected action rejected by game");
                    self.stats.divergences += 1;
                    return IterationOutcome::Diverged;
                }
            };
            node_id = child_id;
        }
    }

    /// Add one uniformly chosen unexplored action under `node_id` and roll
    /// out from the resulting state.
    fn expand(
        &mut self,
        node_id: NodeId,
        state: &G::State,
        unexplored: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> IterationOutcome {
        let Some(action) = unexplored.choose(rng).cloned() else {
            return IterationOutcome::Stalled;
        };

        let next = match self.game.apply_action(state, &action) {
            Ok(next) => next,
            Err(err) => {
                trace!(action = ?action, %err, "expansion rejected by game");
                self.stats.divergences += 1;
                return IterationOutcome::Diverged;
            }
        };

        let value = match self.rollout(next, rng) {
            Ok(value) => value,
            Err(err) => {
                warn!(action = ?action, %err, "rollout rejected by game, dropping iteration");
                self.stats.rollout_failures += 1;
                return IterationOutcome::RolloutFailed;
            }
        };

        let child_id = self.tree.add_child(node_id, action);
        self.stats.expansions += 1;
        self.tree.backpropagate(child_id, value);
        IterationOutcome::Expanded
    }

    /// Play `state` to the end with the rollout policy and return its
    /// (transformed) score.
    fn rollout(&mut self, mut state: G::State, rng: &mut ChaCha20Rng) -> Result<f64, GameError> {
        let max_depth = self.config.max_rollout_depth;
        let mut depth = 0u32;

        while !self.game.is_terminal(&state) {
            if max_depth > 0 && depth >= max_depth {
                self.stats.truncated_rollouts += 1;
                break;
            }

            let legal = self.game.legal_actions(&state);
            let Some(action) = self.rollout.choose(self.game, &state, &legal, rng) else {
                break;
            };
            let next = self.game.apply_action(&state, &action);
            self.stats.rollout_steps += 1;
            state = next?;
            depth += 1;
        }

        Ok(self.config.score_transform.apply(self.game.score(&state)))
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<G::Action> {
        &self.tree
    }

    /// Counters from the most recent run.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The configuration this search runs with.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<G: Game>(
    game: &G,
    config: MctsConfig,
    state: &G::State,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<G::Action>, SearchError> {
    let mut search = MctsSearch::new(game, config);
    search.run(state, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RolloutKind;
    use crate::node::MctsNode;
    use crate::rollout::UniformRollout;
    use crate::test_games::{Bandit, BrokenBranch, Corridor, HiddenDoor, Openings};
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::hash::Hash;
    use std::time::Duration;

    /// Check the structural invariants on every node of a finished tree.
    fn assert_tree_invariants<A: Clone + Eq + Hash + std::fmt::Debug>(tree: &MctsTree<A>) {
        let arena: &[MctsNode<A>] = tree.arena();
        for (idx, node) in arena.iter().enumerate() {
            assert_eq!(
                node.visit_count as usize,
                node.results.len(),
                "node {} visit count out of sync",
                idx
            );

            let child_visits: u32 = node
                .children
                .iter()
                .map(|(_, id)| tree.get(*id).visit_count)
                .sum();
            assert!(
                child_visits <= node.visit_count,
                "node {} children have {} visits, node has {}",
                idx,
                child_visits,
                node.visit_count
            );

            let keys: HashSet<&A> = node.children.iter().map(|(a, _)| a).collect();
            assert_eq!(keys.len(), node.children.len(), "node {} duplicate keys", idx);

            for (action, child_id) in &node.children {
                let child = tree.get(*child_id);
                assert_eq!(child.parent, NodeId(idx as u32));
                assert_eq!(child.action.as_ref(), Some(action));
            }
        }
        assert!(tree.get(tree.root()).parent.is_none());
    }

    #[test]
    fn test_single_legal_action_skips_search() {
        let game = Bandit::new(vec![0.3]);
        let config = MctsConfig::for_testing().with_iterations(100);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let mut search = MctsSearch::new(&game, config);
        let result = search.run(&game.start(), &mut rng).unwrap();

        assert_eq!(result.action, 0);
        assert_eq!(result.stats.iterations, 0);
        assert!(!result.fallback);
        assert_eq!(search.tree().len(), 1);
    }

    #[test]
    fn test_no_legal_moves_is_an_error() {
        let game = Bandit::new(vec![1.0, 0.0]);
        let terminal = game.apply_action(&game.start(), &0).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let err = run_mcts(&game, MctsConfig::for_testing(), &terminal, &mut rng).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoves));
    }

    #[test]
    fn test_deterministic_bandit_always_picks_best_arm() {
        let game = Bandit::new(vec![1.0, 0.0]);
        let config = MctsConfig::for_testing()
            .with_iterations(100)
            .with_exploration(1.0);

        for seed in 0..50 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let result = run_mcts(&game, config.clone(), &game.start(), &mut rng).unwrap();
            assert_eq!(result.action, 0, "seed {} picked the worse arm", seed);
            assert!((result.value - 1.0).abs() < 1e-12);
            assert!(!result.fallback);
        }
    }

    #[test]
    fn test_zero_iterations_falls_back_to_random_legal_action() {
        let game = Bandit::new(vec![0.1, 0.2, 0.3]);
        let config = MctsConfig::for_testing().with_iterations(0);

        let mut seen = HashSet::new();
        for seed in 0..60 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let result = run_mcts(&game, config.clone(), &game.start(), &mut rng).unwrap();
            assert!(result.fallback);
            assert_eq!(result.visits, 0);
            assert!(result.action < 3);
            seen.insert(result.action);
        }

        // Uniform fallback reaches every arm
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_exploration_happens_before_exploitation() {
        let game = Openings::new(6, 3);
        let state = game.start();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let mut search = MctsSearch::new(&game, MctsConfig::for_testing().with_iterations(0));
        search.run(&state, &mut rng).unwrap();

        // Each of the first six iterations must open a new root child
        for expected in 1..=6usize {
            let outcome = search.step(state.clone(), &mut rng);
            assert_eq!(outcome, IterationOutcome::Expanded);

            let root = search.tree().get(search.tree().root());
            assert_eq!(root.children.len(), expected);
            for (_, child_id) in &root.children {
                assert_eq!(search.tree().get(*child_id).visit_count, 1);
            }
        }

        // Only now does a child get a second visit
        search.step(state.clone(), &mut rng);
        let root = search.tree().get(search.tree().root());
        assert_eq!(root.children.len(), 6);
        assert_eq!(root.visit_count, 7);
        assert_tree_invariants(search.tree());
    }

    #[test]
    fn test_terminal_descent_leaves_tree_untouched() {
        let game = Bandit::new(vec![1.0, 0.0]);
        let state = game.start();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut search = MctsSearch::new(&game, MctsConfig::for_testing().with_iterations(0));
        search.run(&state, &mut rng).unwrap();

        search.step(state.clone(), &mut rng);
        search.step(state.clone(), &mut rng);
        let visits_before = search.tree().get(search.tree().root()).visit_count;

        // Both arms explored: descent lands on a terminal child
        let outcome = search.step(state, &mut rng);
        assert_eq!(outcome, IterationOutcome::Terminal);
        assert_eq!(search.tree().get(search.tree().root()).visit_count, visits_before);
    }

    #[test]
    fn test_invariants_hold_after_search() {
        let game = Openings::new(4, 6);
        let config = MctsConfig::for_testing().with_iterations(300);
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let mut search = MctsSearch::new(&game, config);
        let result = search.run(&game.start(), &mut rng).unwrap();

        assert_eq!(result.action, 0);
        assert_tree_invariants(search.tree());
        let stats = search.stats();
        assert_eq!(stats.iterations, 300);
        assert_eq!(
            stats.expansions
                + stats.terminal_hits
                + stats.divergences
                + stats.stalls
                + stats.rollout_failures,
            300
        );
    }

    #[test]
    fn test_more_iterations_find_the_best_opening_more_often() {
        let game = Openings::new(4, 2);
        let trials = 400u64;

        let hit_rate = |iterations: u32| -> f64 {
            let config = MctsConfig::for_testing()
                .with_iterations(iterations)
                .with_exploration(1.0);
            let hits = (0..trials)
                .filter(|seed| {
                    let mut rng = ChaCha20Rng::seed_from_u64(1_000 + seed);
                    run_mcts(&game, config.clone(), &game.start(), &mut rng)
                        .map(|result| result.action == 0)
                        .unwrap_or(false)
                })
                .count();
            hits as f64 / trials as f64
        };

        let rates: Vec<f64> = [1, 2, 4, 32].into_iter().map(hit_rate).collect();
        for pair in rates.windows(2) {
            assert!(pair[0] <= pair[1], "hit rates not monotone: {:?}", rates);
        }
        assert!(rates[0] < 0.4, "one iteration should be close to chance: {:?}", rates);
        assert!((rates[3] - 1.0).abs() < 1e-12, "{:?}", rates);
    }

    #[test]
    fn test_hidden_information_divergence_is_not_fatal() {
        let game = HiddenDoor;
        let state = game.start(0);
        let config = MctsConfig::for_testing().with_iterations(500);
        let mut rng = ChaCha20Rng::seed_from_u64(77);

        let mut search = MctsSearch::new(&game, config);
        let result = search.run(&state, &mut rng).unwrap();

        assert!(result.action == 100 || result.action == 101);
        assert!(search.stats().divergences > 0);
        assert_tree_invariants(search.tree());
    }

    #[test]
    fn test_failed_rollouts_drop_the_iteration() {
        let game = BrokenBranch;
        let config = MctsConfig::for_testing().with_iterations(50);

        for seed in 0..20 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut search = MctsSearch::new(&game, config.clone());
            let result = search.run(&game.start(), &mut rng).unwrap();

            assert_eq!(result.action, 1, "seed {}", seed);
            assert!(!result.fallback);
            assert!((result.value - 0.4).abs() < 1e-12);

            let stats = search.stats();
            assert_eq!(stats.expansions, 1);
            assert_eq!(stats.rollout_failures, 49);
            // The broken opening never gets a node
            assert_eq!(search.tree().len(), 2);
            assert_eq!(search.tree().get(search.tree().root()).visit_count, 1);
            assert_tree_invariants(search.tree());
        }
    }

    #[test]
    fn test_step_reports_failed_rollout() {
        let game = BrokenBranch;
        let mut search = MctsSearch::new(&game, MctsConfig::for_testing());
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let outcomes: Vec<IterationOutcome> =
            (0..8).map(|_| search.step(game.start(), &mut rng)).collect();
        let failed = outcomes
            .iter()
            .filter(|o| **o == IterationOutcome::RolloutFailed)
            .count();
        let expanded = outcomes.len() - failed;

        assert!(failed > 0);
        assert!(expanded <= 1, "{:?}", outcomes);
        assert_eq!(search.stats().rollout_failures as usize, failed);
        assert_eq!(search.tree().len(), 1 + expanded);
    }

    #[test]
    fn test_long_games_do_not_exhaust_the_stack() {
        let game = Corridor { length: 20_000 };
        let config = MctsConfig::for_testing()
            .with_iterations(40)
            .with_max_rollout_depth(0);
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let mut search = MctsSearch::new(&game, config);
        let result = search.run(&(None, 0), &mut rng).unwrap();

        assert_eq!(result.action, 1);
        // No descent gets anywhere near the end, so every iteration expands
        assert_eq!(search.stats().expansions, 40);
        assert_eq!(search.tree().len(), 41);
        assert_eq!(search.stats().truncated_rollouts, 0);
        assert!(search.stats().rollout_steps > 39 * 19_000);
        assert_tree_invariants(search.tree());
    }

    #[test]
    fn test_rollout_depth_cap_truncates() {
        let game = Corridor { length: 1_000 };
        let config = MctsConfig::for_testing()
            .with_iterations(10)
            .with_max_rollout_depth(5);
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let mut search = MctsSearch::new(&game, config);
        search.run(&(None, 0), &mut rng).unwrap();

        assert_eq!(search.stats().truncated_rollouts, 10);
        assert_eq!(search.stats().rollout_steps, 50);
    }

    #[test]
    fn test_time_limit_stops_between_iterations() {
        let game = Openings::new(3, 4);
        let config = MctsConfig::for_testing()
            .with_iterations(1_000_000)
            .with_time_limit(Duration::ZERO);
        let mut rng = ChaCha20Rng::seed_from_u64(8);

        let result = run_mcts(&game, config, &game.start(), &mut rng).unwrap();

        assert_eq!(result.stats.iterations, 0);
        assert!(result.fallback);
    }

    #[test]
    fn test_explicit_rollout_policy() {
        let game = Openings::new(3, 2);
        let config = MctsConfig::for_testing()
            .with_iterations(30)
            .with_rollout(RolloutKind::Greedy);
        let mut rng = ChaCha20Rng::seed_from_u64(12);

        let mut search = MctsSearch::with_rollout(&game, config, UniformRollout::new());
        let result = search.run(&game.start(), &mut rng).unwrap();
        assert_eq!(result.action, 0);
    }

    #[test]
    fn test_squared_scores_are_backpropagated() {
        let game = Bandit::new(vec![0.5, 0.4]);
        let config = MctsConfig::for_testing()
            .with_iterations(10)
            .with_score_transform(crate::config::ScoreTransform::Squared);
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        let result = run_mcts(&game, config, &game.start(), &mut rng).unwrap();
        assert_eq!(result.action, 0);
        assert!((result.value - 0.25).abs() < 1e-12);
    }
}
