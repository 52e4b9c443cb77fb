//! Enemies and their intent cycles
//!
//! Enemy behavior is deterministic: the intent for a turn depends only on the
//! enemy kind and the turn number, so the agent always knows what is coming.

use std::fmt;

/// Enemy kinds available to scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Buffs on the first turn, then attacks with growing strength
    Cultist,
    /// Cycles attack, attack+block and a strength buff
    JawWorm,
}

/// What the enemy does on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Attack(u32),
    AttackDefend { damage: u32, block: u32 },
    Buff { strength: u32, block: u32 },
}

impl EnemyKind {
    pub fn max_hp(self) -> u32 {
        match self {
            EnemyKind::Cultist => 48,
            EnemyKind::JawWorm => 42,
        }
    }

    /// Intent on `turn` (1-based)
    pub fn intent(self, turn: u32) -> Intent {
        match self {
            EnemyKind::Cultist => {
                if turn <= 1 {
                    Intent::Buff {
                        strength: 3,
                        block: 0,
                    }
                } else {
                    Intent::Attack(6)
                }
            }
            EnemyKind::JawWorm => match turn.saturating_sub(1) % 3 {
                0 => Intent::Attack(11),
                1 => Intent::AttackDefend {
                    damage: 7,
                    block: 5,
                },
                _ => Intent::Buff {
                    strength: 3,
                    block: 6,
                },
            },
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnemyKind::Cultist => f.write_str("Cultist"),
            EnemyKind::JawWorm => f.write_str("Jaw Worm"),
        }
    }
}

/// Live enemy state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub hp: u32,
    pub max_hp: u32,
    pub block: u32,
    pub strength: u32,
    /// Turns of Vulnerable left; while positive, attack damage taken is +50%
    pub vulnerable: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        let max_hp = kind.max_hp();
        Self {
            kind,
            hp: max_hp,
            max_hp,
            block: 0,
            strength: 0,
            vulnerable: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Damage an attack of `base` (already including the attacker's
    /// strength) would deal before block.
    pub fn incoming_damage(&self, base: u32) -> u32 {
        if self.vulnerable > 0 {
            base * 3 / 2
        } else {
            base
        }
    }

    /// Apply an attack, block first. Returns hp lost.
    pub fn take_attack(&mut self, base: u32) -> u32 {
        let damage = self.incoming_damage(base);
        let absorbed = damage.min(self.block);
        self.block -= absorbed;
        let lost = (damage - absorbed).min(self.hp);
        self.hp -= lost;
        lost
    }
}
