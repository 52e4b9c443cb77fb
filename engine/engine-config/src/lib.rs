//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared by the
//! search engine and the agent binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`CARDSEARCH_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, compiled in)
//!
//! Command-line flags of the agent binary take their defaults from the loaded
//! configuration, so they sit above all three.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! CARDSEARCH_<SECTION>_<KEY>=value
//!
//! Examples:
//!     CARDSEARCH_COMMON_LOG_LEVEL=debug
//!     CARDSEARCH_MCTS_ITERATIONS=500
//!     CARDSEARCH_MCTS_EXPLORATION=1.4
//!     CARDSEARCH_BATTLE_SCENARIO=challenge
//!     CARDSEARCH_AGENT_STATS_PATH=./stats.json
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_ENV_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
