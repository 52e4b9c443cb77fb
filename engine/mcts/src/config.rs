//! MCTS configuration parameters.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which rollout strategy to use when simulating to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolloutKind {
    /// Uniformly random legal actions
    #[default]
    Random,
    /// Highest immediate action value, random among ties
    Greedy,
}

impl FromStr for RolloutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" | "uniform" => Ok(Self::Random),
            "greedy" | "heuristic" => Ok(Self::Greedy),
            other => Err(format!(
                "unknown rollout policy '{}', expected 'random' or 'greedy'",
                other
            )),
        }
    }
}

impl fmt::Display for RolloutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Greedy => f.write_str("greedy"),
        }
    }
}

/// Shaping applied to a terminal score before it is backpropagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreTransform {
    #[default]
    Raw,
    /// Square the score, sharpening the gap between good and great outcomes
    Squared,
}

impl ScoreTransform {
    #[inline]
    pub fn apply(self, score: f64) -> f64 {
        match self {
            Self::Raw => score,
            Self::Squared => score * score,
        }
    }
}

impl FromStr for ScoreTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "none" => Ok(Self::Raw),
            "squared" | "square" => Ok(Self::Squared),
            other => Err(format!(
                "unknown score transform '{}', expected 'raw' or 'squared'",
                other
            )),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of select/expand/rollout/backpropagate rounds per decision.
    pub iterations: u32,

    /// Exploration constant `c` in UCB1:
    /// mean + c * sqrt(ln(N_parent) / N_child).
    /// 0.0 is pure exploitation once every action has been tried.
    pub exploration: f64,

    /// Rollout strategy, fixed when the search is constructed.
    pub rollout: RolloutKind,

    /// Maximum actions per rollout (0 = play until terminal).
    /// A capped rollout scores the state it reached.
    pub max_rollout_depth: u32,

    /// Optional wall-clock budget, checked only between iterations.
    pub time_limit: Option<Duration>,

    /// Shaping applied to terminal scores.
    pub score_transform: ScoreTransform,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            exploration: 0.5,
            rollout: RolloutKind::Random,
            max_rollout_depth: 0,
            time_limit: None,
            score_transform: ScoreTransform::Raw,
        }
    }
}

impl MctsConfig {
    /// Create config for playing full battles.
    pub fn for_play() -> Self {
        Self {
            iterations: 400,
            max_rollout_depth: 500,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 50,
            exploration: 1.0,
            rollout: RolloutKind::Random,
            max_rollout_depth: 200,
            time_limit: None,
            score_transform: ScoreTransform::Raw,
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the rollout strategy.
    pub fn with_rollout(mut self, rollout: RolloutKind) -> Self {
        self.rollout = rollout;
        self
    }

    /// Builder pattern: set the rollout depth cap.
    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Builder pattern: set the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Builder pattern: set the terminal score shaping.
    pub fn with_score_transform(mut self, transform: ScoreTransform) -> Self {
        self.score_transform = transform;
        self
    }
}
