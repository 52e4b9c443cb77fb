//! Rollout policies for simulating a game to its end.
//!
//! A rollout plays one trajectory from a freshly expanded node to a terminal
//! state; the policy decides which legal action to take at each step.
//! The strategy is picked once when the search is built, so new heuristics
//! plug in without touching the tree algorithm.

use engine_core::Game;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::config::RolloutKind;

/// Trait for rollout policies.
///
/// Implementations could be:
/// - UniformRollout: Uniformly random legal actions
/// - GreedyRollout: Highest immediate damage-like value
pub trait RolloutPolicy<G: Game>: Send + Sync {
    /// Pick one of `legal` to play in `state`.
    ///
    /// Returns None only when `legal` is empty.
    fn choose(
        &self,
        game: &G,
        state: &G::State,
        legal: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> Option<G::Action>;
}

/// Uniform rollout that picks every legal action with equal probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRollout;

impl UniformRollout {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Game> RolloutPolicy<G> for UniformRollout {
    fn choose(
        &self,
        _game: &G,
        _state: &G::State,
        legal: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> Option<G::Action> {
        legal.choose(rng).cloned()
    }
}

/// Greedy rollout that plays the action with the largest immediate value.
///
/// Ties are broken uniformly at random. Actions whose value is not
/// comparable are skipped; when no action is comparable the choice is
/// uniform over all legal actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyRollout;

impl GreedyRollout {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Game> RolloutPolicy<G> for GreedyRollout {
    fn choose(
        &self,
        game: &G,
        state: &G::State,
        legal: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> Option<G::Action> {
        let mut best_value = f64::NEG_INFINITY;
        let mut best: Vec<&G::Action> = Vec::new();

        for action in legal {
            let Some(value) = game.action_value(state, action) else {
                continue;
            };
            if value > best_value {
                best_value = value;
                best.clear();
                best.push(action);
            } else if value == best_value {
                best.push(action);
            }
        }

        if best.is_empty() {
            return legal.choose(rng).cloned();
        }
        best.choose(rng).map(|action| (*action).clone())
    }
}

/// Rollout strategy selected from configuration.
#[derive(Debug, Clone, Copy)]
pub enum Rollout {
    Uniform(UniformRollout),
    Greedy(GreedyRollout),
}

impl Rollout {
    pub fn from_kind(kind: RolloutKind) -> Self {
        match kind {
            RolloutKind::Random => Self::Uniform(UniformRollout),
            RolloutKind::Greedy => Self::Greedy(GreedyRollout),
        }
    }

    pub fn kind(&self) -> RolloutKind {
        match self {
            Self::Uniform(_) => RolloutKind::Random,
            Self::Greedy(_) => RolloutKind::Greedy,
        }
    }
}

impl From<RolloutKind> for Rollout {
    fn from(kind: RolloutKind) -> Self {
        Self::from_kind(kind)
    }
}

impl<G: Game> RolloutPolicy<G> for Rollout {
    fn choose(
        &self,
        game: &G,
        state: &G::State,
        legal: &[G::Action],
        rng: &mut ChaCha20Rng,
    ) -> Option<G::Action> {
        match self {
            Self::Uniform(policy) => policy.choose(game, state, legal, rng),
            Self::Greedy(policy) => policy.choose(game, state, legal, rng),
        }
    }
}
