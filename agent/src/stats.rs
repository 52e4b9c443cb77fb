//! Battle statistics tracking and persistence.
//!
//! This module provides statistics tracking for a battle run, including:
//! - Battle counts and outcomes
//! - MCTS search counters (iterations, divergences, fallbacks)
//! - Timing information
//!
//! Stats can be written to a JSON file for later inspection.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::policy::DecisionReport;

/// How a single battle ended.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub seed: u64,
    pub won: bool,
    /// Turn counter when the battle ended
    pub turns: u32,
    /// Actions the agent took
    pub decisions: u32,
    /// Final score under the battle's scoring mode
    pub score: f64,
    pub player_hp: u32,
    pub enemy_hp: u32,
}

/// Aggregated statistics for one run of battles.
#[derive(Debug)]
pub struct BattleStats {
    env_id: String,
    agent: String,
    battles: u32,
    wins: u32,
    losses: u32,
    /// Battles aborted by an error
    failed: u32,
    total_turns: u64,
    total_decisions: u64,
    total_score: f64,
    /// Player hp summed over won battles
    hp_on_wins: u64,
    /// Decisions that ran a search
    searches: u64,
    /// Searches whose action was drawn at random
    fallbacks: u64,
    iterations: u64,
    divergences: u64,
    truncated_rollouts: u64,
    /// Search iterations dropped because a rollout move was rejected
    rollout_failures: u64,
    search_time_us: u64,
    start_time: Instant,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct BattleStatsSnapshot {
    pub env_id: String,
    pub agent: String,
    pub battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub failed: u32,
    pub win_rate: f64,
    pub avg_turns: f64,
    pub avg_decisions: f64,
    pub avg_score: f64,
    pub avg_hp_on_win: f64,
    pub searches: u64,
    pub fallbacks: u64,
    pub avg_iterations: f64,
    pub divergences: u64,
    pub truncated_rollouts: u64,
    pub rollout_failures: u64,
    pub avg_search_us: f64,
    pub runtime_seconds: f64,
    pub battles_per_second: f64,
    pub timestamp: u64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl BattleStats {
    pub fn new(env_id: &str, agent: &str) -> Self {
        Self {
            env_id: env_id.to_string(),
            agent: agent.to_string(),
            battles: 0,
            wins: 0,
            losses: 0,
            failed: 0,
            total_turns: 0,
            total_decisions: 0,
            total_score: 0.0,
            hp_on_wins: 0,
            searches: 0,
            fallbacks: 0,
            iterations: 0,
            divergences: 0,
            truncated_rollouts: 0,
            rollout_failures: 0,
            search_time_us: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a finished battle.
    pub fn record_battle(&mut self, outcome: &BattleOutcome) {
        self.battles += 1;
        if outcome.won {
            self.wins += 1;
            self.hp_on_wins += outcome.player_hp as u64;
        } else {
            self.losses += 1;
        }
        self.total_turns += outcome.turns as u64;
        self.total_decisions += outcome.decisions as u64;
        self.total_score += outcome.score;
    }

    /// Record a battle that errored out.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record one search-backed decision.
    pub fn record_decision(&mut self, report: &DecisionReport) {
        self.searches += 1;
        if report.fallback {
            self.fallbacks += 1;
        }
        self.iterations += report.search.iterations as u64;
        self.divergences += report.search.divergences as u64;
        self.truncated_rollouts += report.search.truncated_rollouts as u64;
        self.rollout_failures += report.search.rollout_failures as u64;
        self.search_time_us += report.search.total_time_us;
    }

    pub fn battles(&self) -> u32 {
        self.battles
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn searches(&self) -> u64 {
        self.searches
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> BattleStatsSnapshot {
        let battles = self.battles as f64;
        let runtime = self.start_time.elapsed().as_secs_f64();

        BattleStatsSnapshot {
            env_id: self.env_id.clone(),
            agent: self.agent.clone(),
            battles: self.battles,
            wins: self.wins,
            losses: self.losses,
            failed: self.failed,
            win_rate: ratio(self.wins as f64, battles),
            avg_turns: ratio(self.total_turns as f64, battles),
            avg_decisions: ratio(self.total_decisions as f64, battles),
            avg_score: ratio(self.total_score, battles),
            avg_hp_on_win: ratio(self.hp_on_wins as f64, self.wins as f64),
            searches: self.searches,
            fallbacks: self.fallbacks,
            avg_iterations: ratio(self.iterations as f64, self.searches as f64),
            divergences: self.divergences,
            truncated_rollouts: self.truncated_rollouts,
            rollout_failures: self.rollout_failures,
            avg_search_us: ratio(self.search_time_us as f64, self.searches as f64),
            runtime_seconds: runtime,
            battles_per_second: ratio(battles, runtime),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Log a one-line summary of the run so far.
    pub fn log_summary(&self) {
        let snap = self.snapshot();
        info!(
            battles = snap.battles,
            wins = snap.wins,
            losses = snap.losses,
            failed = snap.failed,
            win_rate = format!("{:.1}%", snap.win_rate * 100.0),
            avg_score = format!("{:.3}", snap.avg_score),
            avg_turns = format!("{:.1}", snap.avg_turns),
            searches = snap.searches,
            fallbacks = snap.fallbacks,
            avg_search_ms = format!("{:.2}", snap.avg_search_us / 1000.0),
            "Battle summary"
        );
    }

    /// Write stats to a JSON file (atomic write-then-rename).
    pub fn write_stats(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())
            .context("Failed to serialize battle stats")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        // Write to temp file then rename (atomic on most filesystems)
        let mut temp_path = PathBuf::from(path);
        temp_path.as_mut_os_string().push(".tmp");

        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e)
                .with_context(|| format!("Failed to rename stats file to {}", path.display()));
        }

        debug!("Wrote battle stats to {}", path.display());
        Ok(())
    }
}
