//! MCTS-backed battle agent
//!
//! Runs a fresh search for every decision that has more than one legal
//! action, then maps the chosen search action back onto the concrete hand.

use anyhow::{anyhow, Result};
use engine_core::Game;
use games_cardbattle::{BattleAction, BattleState, CardBattle, TurnAction};
use mcts::{MctsConfig, MctsSearch, SearchError, SearchResult};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::policy::{random_option, retarget, BattleAgent, DecisionReport};

/// Agent that decides every move with Monte Carlo Tree Search
pub struct MctsAgent {
    config: MctsConfig,
    /// Log the search tree after every search
    verbose: bool,
    /// Levels of the tree included in verbose dumps
    dump_depth: usize,
    rng: ChaCha20Rng,
    last: Option<DecisionReport>,
}

impl std::fmt::Debug for MctsAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MctsAgent")
            .field("iterations", &self.config.iterations)
            .field("exploration", &self.config.exploration)
            .field("rollout", &self.config.rollout)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            verbose: false,
            dump_depth: 2,
            rng: ChaCha20Rng::from_entropy(),
            last: None,
        }
    }

    /// Create with a specific seed for determinism
    pub fn with_seed(config: MctsConfig, seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            ..Self::new(config)
        }
    }

    /// Log the top `dump_depth` levels of every search tree
    pub fn with_verbose(mut self, verbose: bool, dump_depth: usize) -> Self {
        self.verbose = verbose;
        self.dump_depth = dump_depth;
        self
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Turn a finished search into an engine action.
    ///
    /// A failed search, or a chosen action with no matching hand slot, falls
    /// back to a random legal move.
    fn resolve(
        &mut self,
        game: &CardBattle,
        state: &BattleState,
        outcome: Result<SearchResult<BattleAction>, SearchError>,
    ) -> Result<(TurnAction, DecisionReport)> {
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(turn = state.turn, error = %e, "MCTS search failed, choosing at random");
                let action = random_option(game, state, &mut self.rng)?;
                let report = DecisionReport {
                    fallback: true,
                    search: Default::default(),
                };
                return Ok((action, report));
            }
        };

        debug!(
            turn = state.turn,
            action = %result.action,
            value = result.value,
            visits = result.visits,
            iterations = result.stats.iterations,
            "MCTS selected action"
        );

        let mut fallback = result.fallback;
        let action = match result.action.to_action(state) {
            Some(action) => action,
            None => {
                warn!(
                    action = %result.action,
                    hand = ?state.hand,
                    "Selected action has no card in hand, choosing at random"
                );
                fallback = true;
                random_option(game, state, &mut self.rng)?
            }
        };

        let report = DecisionReport {
            fallback,
            search: result.stats,
        };
        Ok((action, report))
    }
}

impl BattleAgent for MctsAgent {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn choose_card(&mut self, game: &CardBattle, state: &BattleState) -> Result<TurnAction> {
        self.last = None;

        let legal = game.legal_actions(state);
        let target = self.choose_agent_target(state);

        // Forced move, no tree needed
        if let [only] = legal.as_slice() {
            let action = match only.to_action(state) {
                Some(action) => action,
                None => random_option(game, state, &mut self.rng)?,
            };
            return Ok(retarget(action, target));
        }
        if legal.is_empty() {
            return Err(anyhow!(
                "no actions available on turn {}: battle is over",
                state.turn
            ));
        }

        let mut search = MctsSearch::new(game, self.config.clone());
        let outcome = search.run(state, &mut self.rng);

        if self.verbose && outcome.is_ok() {
            let dump = search.tree().dump(Some(self.dump_depth));
            info!(
                turn = state.turn,
                nodes = search.tree().len(),
                "Search tree:\n{}",
                dump.render()
            );
        }

        let (action, report) = self.resolve(game, state, outcome)?;
        self.last = Some(report);
        Ok(retarget(action, target))
    }

    fn last_decision(&self) -> Option<&DecisionReport> {
        self.last.as_ref()
    }
}
