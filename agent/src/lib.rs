//! Card battle agent
//!
//! Plays seeded card battles with an MCTS agent (or a random baseline) and
//! collects win/loss and search statistics.
//!
//! ```text
//! Config (clap + config.toml) ──► BattleRunner ──► BattleAgent::choose_card
//!                                      │                 │
//!                                      ▼                 ▼
//!                                 BattleStats       MctsSearch (mcts crate)
//!                                      │
//!                                      ▼
//!                              stats JSON (optional)
//! ```

pub mod battle;
pub mod config;
pub mod mcts_agent;
pub mod policy;
pub mod stats;

pub use battle::BattleRunner;
pub use config::{AgentKind, Config};
pub use mcts_agent::MctsAgent;
pub use policy::{BattleAgent, DecisionReport, RandomAgent};
pub use stats::{BattleOutcome, BattleStats, BattleStatsSnapshot};
