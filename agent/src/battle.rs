//! Battle runner: plays a series of seeded battles with one agent.

use anyhow::{Context, Result};
use engine_core::Game;
use games_cardbattle::CardBattle;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, error, info, trace};

use crate::policy::BattleAgent;
use crate::stats::{BattleOutcome, BattleStats};

/// Plays `battles` battles, each dealt from `seed + index`.
#[derive(Debug, Clone)]
pub struct BattleRunner {
    game: CardBattle,
    battles: u32,
    seed: u64,
    /// Log a summary every N battles (0 to disable)
    log_interval: u32,
    show_progress: bool,
}

impl BattleRunner {
    pub fn new(game: CardBattle, battles: u32, seed: u64) -> Self {
        Self {
            game,
            battles,
            seed,
            log_interval: 0,
            show_progress: true,
        }
    }

    pub fn with_log_interval(mut self, log_interval: u32) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Allow a progress bar (it is still only drawn when stderr is a TTY)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn game(&self) -> &CardBattle {
        &self.game
    }

    /// Seed used to deal battle number `index`
    pub fn battle_seed(&self, index: u32) -> u64 {
        self.seed.wrapping_add(index as u64)
    }

    /// Play one battle to the end.
    pub fn play_battle(
        &self,
        agent: &mut dyn BattleAgent,
        seed: u64,
        stats: &mut BattleStats,
    ) -> Result<BattleOutcome> {
        let mut state = self.game.new_battle(seed);
        let mut decisions = 0u32;

        while !state.is_over() {
            let action = agent
                .choose_card(&self.game, &state)
                .with_context(|| format!("{} agent failed on turn {}", agent.name(), state.turn))?;
            if let Some(report) = agent.last_decision() {
                stats.record_decision(report);
            }
            trace!(turn = state.turn, ?action, "Applying action");

            state = self
                .game
                .apply_turn_action(&state, &action)
                .with_context(|| format!("{:?} rejected on turn {}", action, state.turn))?;
            decisions += 1;
        }

        Ok(BattleOutcome {
            seed,
            won: state.is_won(),
            turns: state.turn,
            decisions,
            score: self.game.score(&state),
            player_hp: state.player.hp,
            enemy_hp: state.enemy.hp,
        })
    }

    /// Play every battle, returning the aggregated stats.
    ///
    /// A battle that errors is logged and counted as failed; the run carries
    /// on with the next one.
    pub fn run(&self, agent: &mut dyn BattleAgent) -> Result<BattleStats> {
        let env_id = self.game.engine_id().env_id;
        let mut stats = BattleStats::new(&env_id, agent.name());

        info!(
            env_id = %env_id,
            agent = agent.name(),
            battles = self.battles,
            seed = self.seed,
            "Starting battles"
        );

        // Progress bar only when stderr is a TTY
        let progress = if self.show_progress && std::io::IsTerminal::is_terminal(&std::io::stderr())
        {
            let pb = ProgressBar::new(self.battles as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} battles ({eta})")
                    .context("Invalid progress bar template")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for index in 0..self.battles {
            let seed = self.battle_seed(index);
            let battle_start = Instant::now();

            match self.play_battle(agent, seed, &mut stats) {
                Ok(outcome) => {
                    debug!(
                        battle = index + 1,
                        seed,
                        won = outcome.won,
                        turns = outcome.turns,
                        player_hp = outcome.player_hp,
                        enemy_hp = outcome.enemy_hp,
                        score = outcome.score,
                        duration = battle_start.elapsed().as_secs_f64(),
                        "Battle finished"
                    );
                    stats.record_battle(&outcome);
                }
                Err(e) => {
                    error!("Battle {} (seed {}) failed: {:#}", index + 1, seed, e);
                    stats.record_failure();
                }
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            let completed = index + 1;
            if self.log_interval > 0 && completed % self.log_interval == 0 {
                // Suspend progress bar while logging to avoid visual glitches
                match progress {
                    Some(ref pb) => pb.suspend(|| stats.log_summary()),
                    None => stats.log_summary(),
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        Ok(stats)
    }
}
