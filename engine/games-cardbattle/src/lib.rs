//! Single-enemy card battle for the search engine
//!
//! The player starts each turn with 3 energy and draws 5 cards from a
//! shuffled draw pile, plays cards from hand, then ends the turn. The enemy
//! then acts according to its (public) intent. The battle ends when either
//! side reaches 0 hp or the turn limit runs out.
//!
//! # Hidden information
//!
//! The order of the draw pile is unknown to the agent. `sample_state`
//! reshuffles it and reseeds future reshuffles, so every search iteration
//! sees one plausible future. Transitions themselves are deterministic: when
//! the draw pile runs dry, the discard pile is shuffled with a seed carried
//! in the state.
//!
//! # Actions
//!
//! Two action types exist:
//!
//! - [`BattleAction`]: what the search branches on. One action per distinct
//!   playable card kind plus ending the turn, so two Strikes in hand are a
//!   single edge.
//! - [`TurnAction`]: what the battle engine executes. Cards are referenced by
//!   hand slot and carry a target; [`BattleAction::to_action`] converts.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_cardbattle::{BattleAction, CardBattle, Scenario};
//!
//! let game = CardBattle::new(Scenario::Starter);
//! let state = game.new_battle(42);
//!
//! assert_eq!(state.hand.len(), 5);
//! let actions = game.legal_actions(&state);
//! assert!(actions.contains(&BattleAction::EndTurn));
//! ```

use std::fmt;
use std::str::FromStr;

use engine_core::typed::{EngineId, Game, GameError};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

pub mod card;
pub mod enemy;

pub use card::{CardEffect, CardKind};
pub use enemy::{Enemy, EnemyKind, Intent};

/// Energy granted at the start of every player turn
pub const ENERGY_PER_TURN: u32 = 3;

/// Cards drawn at the start of every player turn
pub const CARDS_PER_TURN: usize = 5;

/// Default turn limit; reaching it counts as a loss
pub const DEFAULT_MAX_TURNS: u32 = 30;

/// Player state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub hp: u32,
    pub max_hp: u32,
    /// Cleared at the start of every player turn
    pub block: u32,
    pub energy: u32,
    pub strength: u32,
}

impl Player {
    fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            block: 0,
            energy: 0,
            strength: 0,
        }
    }

    fn take_attack(&mut self, damage: u32) {
        let absorbed = damage.min(self.block);
        self.block -= absorbed;
        self.hp = self.hp.saturating_sub(damage - absorbed);
    }
}

/// Complete battle snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleState {
    pub player: Player,
    pub enemy: Enemy,
    pub hand: Vec<CardKind>,
    /// Next card to draw is the last element
    pub draw_pile: Vec<CardKind>,
    pub discard_pile: Vec<CardKind>,
    /// Current turn, starting at 1
    pub turn: u32,
    pub max_turns: u32,
    /// Seed for the next discard reshuffle
    shuffle_seed: u64,
}

impl BattleState {
    pub fn is_won(&self) -> bool {
        self.enemy.is_dead()
    }

    pub fn is_lost(&self) -> bool {
        !self.is_won() && (self.player.hp == 0 || self.turn > self.max_turns)
    }

    pub fn is_over(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    /// Enemy intent for the current turn
    pub fn intent(&self) -> Intent {
        self.enemy.kind.intent(self.turn)
    }

    /// Cards in hand that can be paid for, in hand order
    pub fn playable(&self) -> impl Iterator<Item = (usize, CardKind)> + '_ {
        self.hand
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, card)| card.cost() <= self.player.energy)
    }

    /// Draw `count` cards, reshuffling the discard pile when needed.
    fn draw(&mut self, count: usize) {
        for _ in 0..count {
            if self.draw_pile.is_empty() {
                if self.discard_pile.is_empty() {
                    return;
                }
                self.reshuffle_discard();
            }
            if let Some(card) = self.draw_pile.pop() {
                self.hand.push(card);
            }
        }
    }

    fn reshuffle_discard(&mut self) {
        let mut rng = ChaCha20Rng::seed_from_u64(self.shuffle_seed);
        self.draw_pile.append(&mut self.discard_pile);
        self.draw_pile.shuffle(&mut rng);
        self.shuffle_seed = rng.next_u64();
    }

    fn start_player_turn(&mut self) {
        self.player.block = 0;
        self.player.energy = ENERGY_PER_TURN;
        self.draw(CARDS_PER_TURN);
    }

    fn play_card(&mut self, hand_index: usize) {
        let card = self.hand.remove(hand_index);
        self.player.energy -= card.cost();

        let effect = card.effect();
        if effect.damage > 0 {
            self.enemy.take_attack(effect.damage + self.player.strength);
        }
        self.player.block += effect.block;
        self.enemy.vulnerable += effect.vulnerable;
        self.player.strength += effect.strength;
        self.discard_pile.push(card);
        self.draw(effect.draw as usize);
    }

    fn end_turn(&mut self) {
        self.discard_pile.append(&mut self.hand);

        self.enemy.block = 0;
        match self.intent() {
            Intent::Attack(damage) => self.player.take_attack(damage + self.enemy.strength),
            Intent::AttackDefend { damage, block } => {
                self.player.take_attack(damage + self.enemy.strength);
                self.enemy.block += block;
            }
            Intent::Buff { strength, block } => {
                self.enemy.strength += strength;
                self.enemy.block += block;
            }
        }
        self.enemy.vulnerable = self.enemy.vulnerable.saturating_sub(1);

        self.turn += 1;
        if !self.is_over() {
            self.start_player_turn();
        }
    }
}

/// Search-level action: one per playable card kind, plus ending the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleAction {
    PlayCard(CardKind),
    EndTurn,
}

impl BattleAction {
    /// Convert to an engine action against the concrete hand in `state`.
    ///
    /// Returns None if the card is not in hand.
    pub fn to_action(&self, state: &BattleState) -> Option<TurnAction> {
        match self {
            BattleAction::PlayCard(card) => state
                .hand
                .iter()
                .position(|c| c == card)
                .map(|hand_index| TurnAction::PlayCard {
                    hand_index,
                    card: *card,
                    target: 0,
                }),
            BattleAction::EndTurn => Some(TurnAction::EndAgentTurn),
        }
    }
}

impl fmt::Display for BattleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleAction::PlayCard(card) => write!(f, "play {}", card),
            BattleAction::EndTurn => f.write_str("end turn"),
        }
    }
}

/// Engine-level action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    /// Play the card at `hand_index` on enemy `target`
    PlayCard {
        hand_index: usize,
        card: CardKind,
        target: usize,
    },
    EndAgentTurn,
}

/// Battle presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// Starter deck against a Cultist
    #[default]
    Starter,
    /// Mixed deck with less hp against a Jaw Worm
    Challenge,
}

impl Scenario {
    pub fn enemy(self) -> EnemyKind {
        match self {
            Scenario::Starter => EnemyKind::Cultist,
            Scenario::Challenge => EnemyKind::JawWorm,
        }
    }

    pub fn player_hp(self) -> u32 {
        match self {
            Scenario::Starter => 50,
            Scenario::Challenge => 30,
        }
    }

    pub fn deck(self) -> Vec<CardKind> {
        use CardKind::*;
        match self {
            Scenario::Starter => vec![
                Strike, Strike, Strike, Strike, Strike, Defend, Defend, Defend, Defend, Bash,
            ],
            Scenario::Challenge => vec![
                Strike,
                Strike,
                Strike,
                Defend,
                Defend,
                Defend,
                Bash,
                PommelStrike,
                ShrugItOff,
                Bludgeon,
                Inflame,
            ],
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Starter => f.write_str("starter"),
            Scenario::Challenge => f.write_str("challenge"),
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starter" | "basic" => Ok(Scenario::Starter),
            "challenge" => Ok(Scenario::Challenge),
            _ => Err(format!(
                "Unknown scenario: {}. Supported: starter, challenge",
                s
            )),
        }
    }
}

/// How a finished (or truncated) battle is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMode {
    /// 1.0 for a win, otherwise half the fraction of enemy hp removed
    #[default]
    Outcome,
    /// Like `Outcome`, but a win is worth 0.5 plus half the remaining hp fraction
    HealthWeighted,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Outcome => f.write_str("outcome"),
            ScoringMode::HealthWeighted => f.write_str("health"),
        }
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outcome" => Ok(ScoringMode::Outcome),
            "health" | "health_weighted" | "health-weighted" => Ok(ScoringMode::HealthWeighted),
            _ => Err(format!(
                "Unknown scoring mode: {}. Supported: outcome, health",
                s
            )),
        }
    }
}

/// Card battle game
#[derive(Debug, Clone)]
pub struct CardBattle {
    scenario: Scenario,
    scoring: ScoringMode,
    max_turns: u32,
}

impl CardBattle {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            scoring: ScoringMode::default(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn scoring(&self) -> ScoringMode {
        self.scoring
    }

    /// Deal a fresh battle: shuffle the deck with `seed` and draw the
    /// opening hand.
    pub fn new_battle(&self, seed: u64) -> BattleState {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut draw_pile = self.scenario.deck();
        draw_pile.shuffle(&mut rng);

        let mut state = BattleState {
            player: Player::new(self.scenario.player_hp()),
            enemy: Enemy::new(self.scenario.enemy()),
            hand: Vec::with_capacity(CARDS_PER_TURN + 2),
            draw_pile,
            discard_pile: Vec::new(),
            turn: 1,
            max_turns: self.max_turns,
            shuffle_seed: rng.next_u64(),
        };
        state.start_player_turn();
        state
    }

    /// Every engine option for the current turn: each payable hand slot and
    /// ending the turn.
    pub fn turn_options(&self, state: &BattleState) -> Vec<TurnAction> {
        if state.is_over() {
            return Vec::new();
        }
        state
            .playable()
            .map(|(hand_index, card)| TurnAction::PlayCard {
                hand_index,
                card,
                target: 0,
            })
            .chain(std::iter::once(TurnAction::EndAgentTurn))
            .collect()
    }

    /// Execute an engine action.
    pub fn apply_turn_action(
        &self,
        state: &BattleState,
        action: &TurnAction,
    ) -> Result<BattleState, GameError> {
        if state.is_over() {
            return Err(GameError::Terminal);
        }

        let mut next = state.clone();
        match *action {
            TurnAction::PlayCard {
                hand_index,
                card,
                target,
            } => {
                if target != 0 {
                    return Err(GameError::IllegalAction(format!(
                        "no enemy at target {}",
                        target
                    )));
                }
                match state.hand.get(hand_index) {
                    Some(held) if *held == card => {}
                    _ => {
                        return Err(GameError::IllegalAction(format!(
                            "{} is not in hand slot {}",
                            card, hand_index
                        )))
                    }
                }
                if card.cost() > state.player.energy {
                    return Err(GameError::IllegalAction(format!(
                        "{} costs {} energy, {} left",
                        card,
                        card.cost(),
                        state.player.energy
                    )));
                }
                next.play_card(hand_index);
            }
            TurnAction::EndAgentTurn => next.end_turn(),
        }
        Ok(next)
    }

    /// Fraction of enemy hp removed, scaled into [0, 0.5]
    fn partial_credit(state: &BattleState) -> f64 {
        let enemy = &state.enemy;
        if enemy.max_hp == 0 {
            return 0.0;
        }
        0.5 * (enemy.max_hp - enemy.hp) as f64 / enemy.max_hp as f64
    }
}

impl Default for CardBattle {
    fn default() -> Self {
        Self::new(Scenario::default())
    }
}

impl Game for CardBattle {
    type State = BattleState;
    type Action = BattleAction;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: format!("cardbattle-{}", self.scenario),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn legal_actions(&self, state: &BattleState) -> Vec<BattleAction> {
        if state.is_over() {
            return Vec::new();
        }

        let mut actions = Vec::with_capacity(state.hand.len() + 1);
        for (_, card) in state.playable() {
            let action = BattleAction::PlayCard(card);
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
        actions.push(BattleAction::EndTurn);
        actions
    }

    fn apply_action(
        &self,
        state: &BattleState,
        action: &BattleAction,
    ) -> Result<BattleState, GameError> {
        let turn_action = action.to_action(state).ok_or_else(|| {
            GameError::IllegalAction(format!("{} with hand {:?}", action, state.hand))
        })?;
        self.apply_turn_action(state, &turn_action)
    }

    fn is_terminal(&self, state: &BattleState) -> bool {
        state.is_over()
    }

    fn score(&self, state: &BattleState) -> f64 {
        if !state.is_won() {
            return Self::partial_credit(state);
        }
        match self.scoring {
            ScoringMode::Outcome => 1.0,
            ScoringMode::HealthWeighted => {
                0.5 + 0.5 * state.player.hp as f64 / state.player.max_hp.max(1) as f64
            }
        }
    }

    fn sample_state(&self, state: &BattleState, rng: &mut ChaCha20Rng) -> BattleState {
        let mut sample = state.clone();
        sample.draw_pile.shuffle(rng);
        sample.shuffle_seed = rng.gen();
        sample
    }

    fn action_value(&self, state: &BattleState, action: &BattleAction) -> Option<f64> {
        match action {
            BattleAction::PlayCard(card) if card.is_attack() => {
                let base = card.effect().damage + state.player.strength;
                Some(state.enemy.incoming_damage(base) as f64)
            }
            _ => None,
        }
    }
}
