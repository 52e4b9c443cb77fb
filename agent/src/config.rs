//! Configuration for the agent binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use games_cardbattle::{CardBattle, Scenario, ScoringMode};
use mcts::{MctsConfig, RolloutKind, ScoreTransform};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.iterations
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.mcts.exploration
}

fn default_rollout() -> String {
    CENTRAL_CONFIG.mcts.rollout.clone()
}

fn default_max_rollout_depth() -> u32 {
    CENTRAL_CONFIG.mcts.max_rollout_depth
}

fn default_time_limit_ms() -> u64 {
    CENTRAL_CONFIG.mcts.time_limit_ms
}

fn default_score_transform() -> String {
    CENTRAL_CONFIG.mcts.score_transform.clone()
}

fn default_scenario() -> String {
    CENTRAL_CONFIG.battle.scenario.clone()
}

fn default_scoring() -> String {
    CENTRAL_CONFIG.battle.scoring.clone()
}

fn default_max_turns() -> u32 {
    CENTRAL_CONFIG.battle.max_turns
}

fn default_agent() -> String {
    CENTRAL_CONFIG.agent.kind.clone()
}

fn default_battles() -> u32 {
    CENTRAL_CONFIG.agent.battles
}

fn default_verbose() -> bool {
    CENTRAL_CONFIG.agent.verbose
}

fn default_dump_depth() -> usize {
    CENTRAL_CONFIG.agent.dump_depth
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.agent.log_interval
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

/// Which agent plays the battles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Mcts,
    Random,
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mcts" => Ok(AgentKind::Mcts),
            "random" => Ok(AgentKind::Random),
            _ => Err(format!("Unknown agent: {}. Supported: mcts, random", s)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Mcts => f.write_str("mcts"),
            AgentKind::Random => f.write_str("random"),
        }
    }
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "agent")]
#[command(about = "Card battle agent - plays battles with Monte Carlo Tree Search")]
#[command(
    long_about = "Plays a series of seeded card battles, choosing every move with
Monte Carlo Tree Search (or uniformly at random as a baseline), and reports
win rate, scores and search statistics.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// MCTS iterations per decision
    #[arg(short = 'n', long, default_value_t = default_iterations())]
    pub iterations: u32,

    /// UCB1 exploration constant
    #[arg(short = 'p', long = "param", default_value_t = default_exploration())]
    pub exploration: f64,

    /// Log the search tree after every decision
    #[arg(short, long, default_value_t = default_verbose())]
    pub verbose: bool,

    /// Rollout policy (random, greedy)
    #[arg(long, default_value_t = default_rollout())]
    pub rollout: String,

    /// Maximum actions per rollout (0 for unbounded)
    #[arg(long, default_value_t = default_max_rollout_depth())]
    pub max_rollout_depth: u32,

    /// Per-decision time budget in milliseconds (0 to disable)
    #[arg(long, default_value_t = default_time_limit_ms())]
    pub time_limit_ms: u64,

    /// Shaping of rollout scores (raw, squared)
    #[arg(long, default_value_t = default_score_transform())]
    pub score_transform: String,

    /// Battle preset (starter, challenge)
    #[arg(long, default_value_t = default_scenario())]
    pub scenario: String,

    /// Scoring mode (outcome, health)
    #[arg(long, default_value_t = default_scoring())]
    pub scoring: String,

    /// Turn limit per battle; running out counts as a loss
    #[arg(long, default_value_t = default_max_turns())]
    pub max_turns: u32,

    /// Agent to play with (mcts, random)
    #[arg(long, default_value_t = default_agent())]
    pub agent: String,

    /// Number of battles to play
    #[arg(long, default_value_t = default_battles())]
    pub battles: u32,

    /// Master seed; battle i is dealt from seed + i (random when unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tree levels shown with --verbose
    #[arg(long, default_value_t = default_dump_depth())]
    pub dump_depth: usize,

    /// Log a summary every N battles (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Write a JSON stats snapshot here when done
    #[arg(long)]
    pub stats_path: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    /// Parse the command line and fill unset optional values from config.toml.
    pub fn load() -> Self {
        let mut config = Self::parse();
        config.seed = config.seed.or(CENTRAL_CONFIG.common.seed);
        config.stats_path = config
            .stats_path
            .or_else(|| CENTRAL_CONFIG.agent.stats_path.clone());
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration parameter must be a finite number >= 0, got {}",
                self.exploration
            ));
        }

        if self.battles == 0 {
            return Err(anyhow!("battles must be greater than 0"));
        }

        if self.max_turns == 0 {
            return Err(anyhow!("max_turns must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.mcts_config()?;
        self.game()?;
        self.agent_kind()?;

        Ok(())
    }

    /// Search settings for every decision
    pub fn mcts_config(&self) -> Result<MctsConfig> {
        let rollout: RolloutKind = self.rollout.parse().map_err(|e: String| anyhow!(e))?;
        let score_transform: ScoreTransform = self
            .score_transform
            .parse()
            .map_err(|e: String| anyhow!(e))?;

        let mut config = MctsConfig::default()
            .with_iterations(self.iterations)
            .with_exploration(self.exploration)
            .with_rollout(rollout)
            .with_max_rollout_depth(self.max_rollout_depth)
            .with_score_transform(score_transform);
        if self.time_limit_ms > 0 {
            config = config.with_time_limit(Duration::from_millis(self.time_limit_ms));
        }
        Ok(config)
    }

    /// The battle every run plays
    pub fn game(&self) -> Result<CardBattle> {
        let scenario: Scenario = self.scenario.parse().map_err(|e: String| anyhow!(e))?;
        let scoring: ScoringMode = self.scoring.parse().map_err(|e: String| anyhow!(e))?;
        Ok(CardBattle::new(scenario)
            .with_scoring(scoring)
            .with_max_turns(self.max_turns))
    }

    pub fn agent_kind(&self) -> Result<AgentKind> {
        self.agent.parse().map_err(|e: String| anyhow!(e))
    }
}
