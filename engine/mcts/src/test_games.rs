//! Small games with known answers, used by the search tests.

use engine_core::{EngineId, Game, GameError};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

fn test_id(name: &str) -> EngineId {
    EngineId {
        env_id: name.to_string(),
        build_id: "test".to_string(),
    }
}

/// One decision: pull an arm, receive its fixed reward, game over.
#[derive(Debug)]
pub struct Bandit {
    rewards: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BanditState {
    pub pulled: Option<usize>,
}

impl Bandit {
    pub fn new(rewards: Vec<f64>) -> Self {
        Self { rewards }
    }

    pub fn start(&self) -> BanditState {
        BanditState { pulled: None }
    }
}

impl Game for Bandit {
    type State = BanditState;
    type Action = usize;

    fn engine_id(&self) -> EngineId {
        test_id("bandit")
    }

    fn legal_actions(&self, state: &BanditState) -> Vec<usize> {
        match state.pulled {
            Some(_) => Vec::new(),
            None => (0..self.rewards.len()).collect(),
        }
    }

    fn apply_action(&self, state: &BanditState, action: &usize) -> Result<BanditState, GameError> {
        if state.pulled.is_some() {
            return Err(GameError::Terminal);
        }
        if *action >= self.rewards.len() {
            return Err(GameError::IllegalAction(format!("arm {}", action)));
        }
        Ok(BanditState {
            pulled: Some(*action),
        })
    }

    fn is_terminal(&self, state: &BanditState) -> bool {
        state.pulled.is_some()
    }

    fn score(&self, state: &BanditState) -> f64 {
        state.pulled.map(|arm| self.rewards[arm]).unwrap_or(0.0)
    }
}

/// Like `Bandit`, but every arm scores zero and carries an optional
/// immediate value for heuristic rollouts.
#[derive(Debug)]
pub struct ValuedChoice {
    values: Vec<Option<f64>>,
}

impl ValuedChoice {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn start(&self) -> BanditState {
        BanditState { pulled: None }
    }
}

impl Game for ValuedChoice {
    type State = BanditState;
    type Action = usize;

    fn engine_id(&self) -> EngineId {
        test_id("valued-choice")
    }

    fn legal_actions(&self, state: &BanditState) -> Vec<usize> {
        match state.pulled {
            Some(_) => Vec::new(),
            None => (0..self.values.len()).collect(),
        }
    }

    fn apply_action(&self, state: &BanditState, action: &usize) -> Result<BanditState, GameError> {
        if state.pulled.is_some() || *action >= self.values.len() {
            return Err(GameError::IllegalAction(format!("choice {}", action)));
        }
        Ok(BanditState {
            pulled: Some(*action),
        })
    }

    fn is_terminal(&self, state: &BanditState) -> bool {
        state.pulled.is_some()
    }

    fn score(&self, _state: &BanditState) -> f64 {
        0.0
    }

    fn action_value(&self, _state: &BanditState, action: &usize) -> Option<f64> {
        self.values.get(*action).copied().flatten()
    }
}

/// Deterministic two-phase game: pick an opening, then play `tail` filler
/// moves. Only the opening matters: opening 0 scores 1.0, opening k scores
/// `0.5 - 0.1 * k`.
#[derive(Debug)]
pub struct Openings {
    openings: usize,
    tail: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpeningsState {
    pub opening: Option<usize>,
    pub remaining: u32,
}

impl Openings {
    pub fn new(openings: usize, tail: u32) -> Self {
        Self { openings, tail }
    }

    pub fn start(&self) -> OpeningsState {
        OpeningsState {
            opening: None,
            remaining: self.tail,
        }
    }
}

impl Game for Openings {
    type State = OpeningsState;
    type Action = usize;

    fn engine_id(&self) -> EngineId {
        test_id("openings")
    }

    fn legal_actions(&self, state: &OpeningsState) -> Vec<usize> {
        match state.opening {
            None => (0..self.openings).collect(),
            Some(_) if state.remaining > 0 => vec![0, 1],
            Some(_) => Vec::new(),
        }
    }

    fn apply_action(&self, state: &OpeningsState, action: &usize) -> Result<OpeningsState, GameError> {
        if !self.legal_actions(state).contains(action) {
            return Err(GameError::IllegalAction(format!("move {}", action)));
        }
        let mut next = state.clone();
        match next.opening {
            None => next.opening = Some(*action),
            Some(_) => next.remaining -= 1,
        }
        Ok(next)
    }

    fn is_terminal(&self, state: &OpeningsState) -> bool {
        state.opening.is_some() && state.remaining == 0
    }

    fn score(&self, state: &OpeningsState) -> f64 {
        match state.opening {
            Some(0) => 1.0,
            Some(k) => 0.5 - 0.1 * k as f64,
            None => 0.0,
        }
    }
}

/// Hidden-information game. A secret in `0..3` decides which two actions are
/// legal on the second move; the agent cannot see it, so every resample may
/// invalidate actions the tree explored under an earlier sample.
#[derive(Debug)]
pub struct HiddenDoor;

#[derive(Debug, Clone, PartialEq)]
pub struct HiddenDoorState {
    pub secret: u8,
    pub moves: Vec<u8>,
}

impl HiddenDoor {
    pub fn start(&self, secret: u8) -> HiddenDoorState {
        HiddenDoorState {
            secret,
            moves: Vec::new(),
        }
    }
}

impl Game for HiddenDoor {
    type State = HiddenDoorState;
    type Action = u8;

    fn engine_id(&self) -> EngineId {
        test_id("hidden-door")
    }

    fn legal_actions(&self, state: &HiddenDoorState) -> Vec<u8> {
        match state.moves.len() {
            0 => vec![100, 101],
            1 => vec![state.secret, state.secret + 10],
            _ => Vec::new(),
        }
    }

    fn apply_action(&self, state: &HiddenDoorState, action: &u8) -> Result<HiddenDoorState, GameError> {
        if !self.legal_actions(state).contains(action) {
            return Err(GameError::IllegalAction(format!("door {}", action)));
        }
        let mut next = state.clone();
        next.moves.push(*action);
        Ok(next)
    }

    fn is_terminal(&self, state: &HiddenDoorState) -> bool {
        state.moves.len() >= 2
    }

    fn score(&self, state: &HiddenDoorState) -> f64 {
        match state.moves.last() {
            Some(last) if *last >= 10 && *last < 100 => 1.0,
            Some(_) => 0.25,
            None => 0.0,
        }
    }

    fn sample_state(&self, state: &HiddenDoorState, rng: &mut ChaCha20Rng) -> HiddenDoorState {
        HiddenDoorState {
            secret: rng.gen_range(0..3),
            moves: state.moves.clone(),
        }
    }
}

/// Long forced corridor: two choices at the start, then a single legal move
/// per step for `length` steps.
#[derive(Debug)]
pub struct Corridor {
    pub length: u32,
}

impl Game for Corridor {
    type State = (Option<bool>, u32);
    type Action = u32;

    fn engine_id(&self) -> EngineId {
        test_id("corridor")
    }

    fn legal_actions(&self, state: &(Option<bool>, u32)) -> Vec<u32> {
        match state {
            (None, _) => vec![0, 1],
            (Some(_), step) if *step < self.length => vec![*step + 2],
            _ => Vec::new(),
        }
    }

    fn apply_action(
        &self,
        state: &(Option<bool>, u32),
        action: &u32,
    ) -> Result<(Option<bool>, u32), GameError> {
        if !self.legal_actions(state).contains(action) {
            return Err(GameError::IllegalAction(format!("step {}", action)));
        }
        Ok(match state.0 {
            None => (Some(*action == 1), 0),
            Some(side) => (Some(side), state.1 + 1),
        })
    }

    fn is_terminal(&self, state: &(Option<bool>, u32)) -> bool {
        state.0.is_some() && state.1 >= self.length
    }

    fn score(&self, state: &(Option<bool>, u32)) -> f64 {
        match state.0 {
            Some(true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Two openings. Opening 1 is finished by one more move and scores 0.4;
/// opening 2 lands in a position the rules cannot advance, so every rollout
/// through it fails.
#[derive(Debug)]
pub struct BrokenBranch;

impl BrokenBranch {
    pub fn start(&self) -> Vec<u8> {
        Vec::new()
    }
}

impl Game for BrokenBranch {
    type State = Vec<u8>;
    type Action = u8;

    fn engine_id(&self) -> EngineId {
        test_id("broken-branch")
    }

    fn legal_actions(&self, state: &Vec<u8>) -> Vec<u8> {
        match state.len() {
            0 => vec![1, 2],
            1 => vec![10],
            _ => Vec::new(),
        }
    }

    fn apply_action(&self, state: &Vec<u8>, action: &u8) -> Result<Vec<u8>, GameError> {
        if !self.legal_actions(state).contains(action) {
            return Err(GameError::IllegalAction(format!("move {}", action)));
        }
        if state.as_slice() == [2] {
            return Err(GameError::InvalidState("opening 2 cannot continue".to_string()));
        }
        let mut next = state.clone();
        next.push(*action);
        Ok(next)
    }

    fn is_terminal(&self, state: &Vec<u8>) -> bool {
        state.len() >= 2
    }

    fn score(&self, state: &Vec<u8>) -> f64 {
        match state.first() {
            Some(1) => 0.4,
            _ => 1.0,
        }
    }
}
