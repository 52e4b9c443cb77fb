//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_rollout() -> String {
    defaults::rollout().into()
}
fn d_max_rollout_depth() -> u32 {
    defaults::max_rollout_depth()
}
fn d_time_limit_ms() -> u64 {
    defaults::time_limit_ms()
}
fn d_score_transform() -> String {
    defaults::score_transform().into()
}
fn d_scenario() -> String {
    defaults::scenario().into()
}
fn d_scoring() -> String {
    defaults::scoring().into()
}
fn d_max_turns() -> u32 {
    defaults::max_turns()
}
fn d_agent_kind() -> String {
    defaults::agent_kind().into()
}
fn d_battles() -> u32 {
    defaults::battles()
}
fn d_verbose() -> bool {
    defaults::verbose()
}
fn d_dump_depth() -> usize {
    defaults::dump_depth()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub battle: BattleConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Master seed for battles and searches (None = from entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: None,
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    #[serde(default = "d_rollout")]
    pub rollout: String,
    #[serde(default = "d_max_rollout_depth")]
    pub max_rollout_depth: u32,
    /// Per-decision time budget in milliseconds (0 = none)
    #[serde(default = "d_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default = "d_score_transform")]
    pub score_transform: String,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            exploration: defaults::exploration(),
            rollout: defaults::rollout().into(),
            max_rollout_depth: defaults::max_rollout_depth(),
            time_limit_ms: defaults::time_limit_ms(),
            score_transform: defaults::score_transform().into(),
        }
    }
}

/// Battle setup
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BattleConfig {
    #[serde(default = "d_scenario")]
    pub scenario: String,
    #[serde(default = "d_scoring")]
    pub scoring: String,
    #[serde(default = "d_max_turns")]
    pub max_turns: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            scenario: defaults::scenario().into(),
            scoring: defaults::scoring().into(),
            max_turns: defaults::max_turns(),
        }
    }
}

/// Agent runner configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    /// "mcts" or "random"
    #[serde(default = "d_agent_kind")]
    pub kind: String,
    #[serde(default = "d_battles")]
    pub battles: u32,
    #[serde(default = "d_verbose")]
    pub verbose: bool,
    #[serde(default = "d_dump_depth")]
    pub dump_depth: usize,
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
    /// Where to write the JSON stats snapshot (None = don't write)
    #[serde(default)]
    pub stats_path: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            kind: defaults::agent_kind().into(),
            battles: defaults::battles(),
            verbose: defaults::verbose(),
            dump_depth: defaults::dump_depth(),
            log_interval: defaults::log_interval(),
            stats_path: None,
        }
    }
}
