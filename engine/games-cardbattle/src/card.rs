//! Card definitions
//!
//! Every card is fully described by its kind: cost and effects are fixed, so
//! a hand is just a list of `CardKind` values.

use std::fmt;
use std::str::FromStr;

/// Playable card kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardKind {
    /// 1 energy: deal 6 damage
    Strike,
    /// 1 energy: gain 5 block
    Defend,
    /// 2 energy: deal 8 damage, apply 2 Vulnerable
    Bash,
    /// 1 energy: deal 9 damage, draw 1 card
    PommelStrike,
    /// 1 energy: gain 8 block, draw 1 card
    ShrugItOff,
    /// 3 energy: deal 32 damage
    Bludgeon,
    /// 1 energy: gain 2 strength
    Inflame,
}

/// What playing a card does, resolved in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardEffect {
    pub damage: u32,
    pub block: u32,
    pub vulnerable: u32,
    pub draw: u32,
    pub strength: u32,
}

impl CardKind {
    pub const ALL: [CardKind; 7] = [
        CardKind::Strike,
        CardKind::Defend,
        CardKind::Bash,
        CardKind::PommelStrike,
        CardKind::ShrugItOff,
        CardKind::Bludgeon,
        CardKind::Inflame,
    ];

    /// Energy needed to play this card
    pub fn cost(self) -> u32 {
        match self {
            CardKind::Bash => 2,
            CardKind::Bludgeon => 3,
            _ => 1,
        }
    }

    pub fn effect(self) -> CardEffect {
        let none = CardEffect::default();
        match self {
            CardKind::Strike => CardEffect { damage: 6, ..none },
            CardKind::Defend => CardEffect { block: 5, ..none },
            CardKind::Bash => CardEffect {
                damage: 8,
                vulnerable: 2,
                ..none
            },
            CardKind::PommelStrike => CardEffect {
                damage: 9,
                draw: 1,
                ..none
            },
            CardKind::ShrugItOff => CardEffect {
                block: 8,
                draw: 1,
                ..none
            },
            CardKind::Bludgeon => CardEffect { damage: 32, ..none },
            CardKind::Inflame => CardEffect { strength: 2, ..none },
        }
    }

    /// Whether the card deals damage (and so has a damage-like value)
    pub fn is_attack(self) -> bool {
        self.effect().damage > 0
    }

    pub fn name(self) -> &'static str {
        match self {
            CardKind::Strike => "Strike",
            CardKind::Defend => "Defend",
            CardKind::Bash => "Bash",
            CardKind::PommelStrike => "Pommel Strike",
            CardKind::ShrugItOff => "Shrug It Off",
            CardKind::Bludgeon => "Bludgeon",
            CardKind::Inflame => "Inflame",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        CardKind::ALL
            .into_iter()
            .find(|kind| {
                kind.name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(key.chars())
            })
            .ok_or_else(|| format!("unknown card: {}", s))
    }
}
