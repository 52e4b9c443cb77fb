//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time, so
//! the documented defaults file and the binary can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    battle: BattleDefaults,
    agent: AgentDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    iterations: u32,
    exploration: f64,
    rollout: String,
    max_rollout_depth: u32,
    time_limit_ms: u64,
    score_transform: String,
}

#[derive(Debug, Deserialize)]
struct BattleDefaults {
    scenario: String,
    scoring: String,
    max_turns: u32,
}

#[derive(Debug, Deserialize)]
struct AgentDefaults {
    kind: String,
    battles: u32,
    verbose: bool,
    dump_depth: usize,
    log_interval: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn iterations() -> u32 {
    DEFAULTS.mcts.iterations
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn rollout() -> &'static str {
    &DEFAULTS.mcts.rollout
}
pub fn max_rollout_depth() -> u32 {
    DEFAULTS.mcts.max_rollout_depth
}
pub fn time_limit_ms() -> u64 {
    DEFAULTS.mcts.time_limit_ms
}
pub fn score_transform() -> &'static str {
    &DEFAULTS.mcts.score_transform
}

// Battle
pub fn scenario() -> &'static str {
    &DEFAULTS.battle.scenario
}
pub fn scoring() -> &'static str {
    &DEFAULTS.battle.scoring
}
pub fn max_turns() -> u32 {
    DEFAULTS.battle.max_turns
}

// Agent
pub fn agent_kind() -> &'static str {
    &DEFAULTS.agent.kind
}
pub fn battles() -> u32 {
    DEFAULTS.agent.battles
}
pub fn verbose() -> bool {
    DEFAULTS.agent.verbose
}
pub fn dump_depth() -> usize {
    DEFAULTS.agent.dump_depth
}
pub fn log_interval() -> u32 {
    DEFAULTS.agent.log_interval
}
