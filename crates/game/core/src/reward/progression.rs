//! Experience and level math for users and cards.

use crate::config::BattleConfig;
use crate::env::{RngOracle, RollContext, compute_seed};

use super::{ChestRank, Grant};

/// A level with experience toward the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub level: u32,
    pub xp: u32,
}

impl Progress {
    pub const fn new(level: u32, xp: u32) -> Self {
        Self { level, xp }
    }

    /// Adds experience, carrying every full `per_level` into levels.
    /// Returns the number of levels gained.
    pub fn gain(&mut self, amount: u32, per_level: u32) -> u32 {
        let per_level = per_level.max(1);
        let total = self.xp.saturating_add(amount);
        let levels = total / per_level;
        self.xp = total % per_level;
        self.level = self.level.saturating_add(levels);
        levels
    }
}

/// Chance, in percent, that reaching `level` yields a chest of its bracket's
/// rank. Rises through each ten-level bracket and resets at the next.
pub fn level_chest_chance(level: u32) -> u32 {
    match level % 10 {
        0 => 100,
        rem => rem * 10,
    }
}

/// Grants for every level from `from + 1` through `to`.
///
/// Each level pays `level * level_up_currency_per_level` and a chest: the
/// bracket's rank on a successful roll, otherwise one rank lower when there is
/// one.
pub fn level_up_grants(
    from: u32,
    to: u32,
    config: &BattleConfig,
    rng: &dyn RngOracle,
    seed: u64,
) -> Vec<Grant> {
    let mut grants = Vec::new();
    for level in from.saturating_add(1)..=to {
        grants.push(Grant::Currency(
            u64::from(level) * config.level_up_currency_per_level,
        ));

        let rank = ChestRank::for_bracket(level.saturating_sub(1) / 10);
        let roll_seed = compute_seed(seed, u64::from(level), 2, RollContext::Reward);
        let won = if rng.chance(roll_seed, level_chest_chance(level)) {
            Some(rank)
        } else {
            rank.previous()
        };
        if let Some(rank) = won {
            grants.push(Grant::Chest { rank, amount: 1 });
        }
    }
    grants
}
