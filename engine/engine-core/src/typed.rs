//! Typed Game trait providing the state adapter consumed by the search
//!
//! Games work with strongly-typed state and action values. The search never
//! inspects either: it stores actions as tree edges and hands states back to
//! the game for every query.

use rand_chacha::ChaCha20Rng;
use std::fmt::Debug;
use std::hash::Hash;

/// Engine identification information
#[derive(Debug, Clone, PartialEq)]
pub struct EngineId {
    pub env_id: String,
    pub build_id: String,
}

/// Main trait for game implementations
///
/// # Transition discipline
///
/// `apply_action` is a pure function: it borrows the input snapshot and
/// returns a new one. Any randomness a transition needs must be derived from
/// data carried inside the state (for example a shuffle seed), so applying the
/// same action to the same snapshot always produces the same result. Chance
/// that the agent cannot observe is resolved by `sample_state`, which the
/// search calls once per iteration at the root.
///
/// # Type Parameters
///
/// * `State` - Game state snapshot, cloned whenever the search branches
/// * `Action` - Opaque action key, used as a tree edge label
///
/// # Example
///
/// ```rust
/// # use engine_core::typed::*;
/// #[derive(Debug)]
/// struct Countdown;
///
/// impl Game for Countdown {
///     type State = u32;
///     type Action = u32;
///
///     fn engine_id(&self) -> EngineId {
///         EngineId { env_id: "countdown".into(), build_id: "0.1.0".into() }
///     }
///     fn legal_actions(&self, state: &u32) -> Vec<u32> {
///         (1..=(*state).min(2)).collect()
///     }
///     fn apply_action(&self, state: &u32, action: &u32) -> Result<u32, GameError> {
///         state
///             .checked_sub(*action)
///             .ok_or_else(|| GameError::IllegalAction(format!("{action}")))
///     }
///     fn is_terminal(&self, state: &u32) -> bool {
///         *state == 0
///     }
///     fn score(&self, _state: &u32) -> f64 {
///         1.0
///     }
/// }
///
/// let game = Countdown;
/// assert_eq!(game.apply_action(&5, &2).unwrap(), 3);
/// ```
pub trait Game: Send + Sync + Debug + 'static {
    /// Game state snapshot
    type State: Clone + Debug + Send + Sync + 'static;

    /// Action key - compared and hashed, never interpreted by the search
    type Action: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Get engine identification information
    fn engine_id(&self) -> EngineId;

    /// Legal actions in `state`, without duplicates.
    ///
    /// Only terminal states may return an empty list.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Apply `action` to `state`, returning the successor snapshot.
    ///
    /// The input is left untouched. Actions that are not legal in `state`
    /// must yield `GameError::IllegalAction`.
    fn apply_action(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<Self::State, GameError>;

    /// Whether the game is over in `state`
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Scalar outcome of `state`; larger is better for the searching agent.
    fn score(&self, state: &Self::State) -> f64;

    /// Resolve hidden or stochastic information into one concrete snapshot.
    ///
    /// Perfect-information games keep the default, which returns a copy.
    fn sample_state(&self, state: &Self::State, _rng: &mut ChaCha20Rng) -> Self::State {
        state.clone()
    }

    /// Immediate damage-like value of playing `action` in `state`.
    ///
    /// `None` means the action has no comparable value. Used by heuristic
    /// rollout policies.
    fn action_value(&self, _state: &Self::State, _action: &Self::Action) -> Option<f64> {
        None
    }
}

/// Error type for state transitions
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Illegal action: {0}")]
    IllegalAction(String),
    #[error("Game is already over")]
    Terminal,
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
