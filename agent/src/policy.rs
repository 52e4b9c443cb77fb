//! Action selection agents for card battles

use anyhow::{anyhow, Result};
use games_cardbattle::{BattleState, CardBattle, TurnAction};
use mcts::SearchStats;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

/// What the last search-backed decision looked like.
#[derive(Debug, Clone)]
pub struct DecisionReport {
    /// The chosen action was picked at random instead of from the tree
    pub fallback: bool,
    /// Counters from the search that produced the decision
    pub search: SearchStats,
}

/// An agent that picks engine actions during a battle.
pub trait BattleAgent {
    /// Short label used in logs and stats
    fn name(&self) -> &'static str;

    /// Choose the next engine action in `state`.
    ///
    /// Fails only when `state` offers nothing to do, which means the battle
    /// is already over.
    fn choose_card(&mut self, game: &CardBattle, state: &BattleState) -> Result<TurnAction>;

    /// Which enemy an attack is aimed at.
    fn choose_agent_target(&mut self, _state: &BattleState) -> usize {
        0
    }

    /// Which hand card an effect applies to, if it needs one.
    ///
    /// Single-target passthrough kept for the engine's card-target hook: no
    /// card in the current set picks a hand card, so `BattleRunner` never
    /// asks. Defaults to the first card.
    fn choose_card_target(&mut self, state: &BattleState) -> Option<usize> {
        if state.hand.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// Report for the most recent `choose_card` call, if it ran a search.
    fn last_decision(&self) -> Option<&DecisionReport> {
        None
    }
}

/// Aim `action` at `target` if it is an attack.
pub fn retarget(action: TurnAction, target: usize) -> TurnAction {
    match action {
        TurnAction::PlayCard {
            hand_index, card, ..
        } => TurnAction::PlayCard {
            hand_index,
            card,
            target,
        },
        TurnAction::EndAgentTurn => TurnAction::EndAgentTurn,
    }
}

/// Uniform choice over the engine's options for the current turn.
pub(crate) fn random_option(
    game: &CardBattle,
    state: &BattleState,
    rng: &mut ChaCha20Rng,
) -> Result<TurnAction> {
    game.turn_options(state)
        .choose(rng)
        .copied()
        .ok_or_else(|| anyhow!("no actions available on turn {}: battle is over", state.turn))
}

/// Agent that plays uniformly random legal moves.
#[derive(Debug)]
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleAgent for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_card(&mut self, game: &CardBattle, state: &BattleState) -> Result<TurnAction> {
        let action = random_option(game, state, &mut self.rng)?;
        let target = self.choose_agent_target(state);
        Ok(retarget(action, target))
    }
}
