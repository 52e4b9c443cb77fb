//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::Path;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CARDSEARCH_CONFIG";

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by CARDSEARCH_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files are reported and replaced by the defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) = std::env::var($key) {
            match v.parse() {
                Ok(parsed) => $config.$section.$field = parsed,
                Err(_) => warn!("Ignoring {}={}: not a valid value", $key, v),
            }
        }
    };
    // Optional string field
    ($config:expr, $section:ident . $field:ident, $key:expr, optional) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = Some(v);
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) = std::env::var($key) {
            match v.parse() {
                Ok(parsed) => $config.$section.$field = Some(parsed),
                Err(_) => warn!("Ignoring {}={}: not a valid value", $key, v),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: CARDSEARCH_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "CARDSEARCH_COMMON_LOG_LEVEL");
    env_override!(
        config,
        common.seed,
        "CARDSEARCH_COMMON_SEED",
        optional_parse
    );

    // MCTS
    env_override!(
        config,
        mcts.iterations,
        "CARDSEARCH_MCTS_ITERATIONS",
        parse
    );
    env_override!(
        config,
        mcts.exploration,
        "CARDSEARCH_MCTS_EXPLORATION",
        parse
    );
    env_override!(config, mcts.rollout, "CARDSEARCH_MCTS_ROLLOUT");
    env_override!(
        config,
        mcts.max_rollout_depth,
        "CARDSEARCH_MCTS_MAX_ROLLOUT_DEPTH",
        parse
    );
    env_override!(
        config,
        mcts.time_limit_ms,
        "CARDSEARCH_MCTS_TIME_LIMIT_MS",
        parse
    );
    env_override!(
        config,
        mcts.score_transform,
        "CARDSEARCH_MCTS_SCORE_TRANSFORM"
    );

    // Battle
    env_override!(config, battle.scenario, "CARDSEARCH_BATTLE_SCENARIO");
    env_override!(config, battle.scoring, "CARDSEARCH_BATTLE_SCORING");
    env_override!(
        config,
        battle.max_turns,
        "CARDSEARCH_BATTLE_MAX_TURNS",
        parse
    );

    // Agent
    env_override!(config, agent.kind, "CARDSEARCH_AGENT_KIND");
    env_override!(config, agent.battles, "CARDSEARCH_AGENT_BATTLES", parse);
    env_override!(config, agent.verbose, "CARDSEARCH_AGENT_VERBOSE", parse);
    env_override!(
        config,
        agent.dump_depth,
        "CARDSEARCH_AGENT_DUMP_DEPTH",
        parse
    );
    env_override!(
        config,
        agent.log_interval,
        "CARDSEARCH_AGENT_LOG_INTERVAL",
        parse
    );
    env_override!(
        config,
        agent.stats_path,
        "CARDSEARCH_AGENT_STATS_PATH",
        optional
    );

    config
}
