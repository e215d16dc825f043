use std::collections::BTreeMap;

use crate::env::{RollContext, compute_seed};

use super::{CombatantSnapshot, EnemySnapshot};

/// Consumables that can be spent on a heal.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealItem {
    #[strum(serialize = "meat")]
    Meat,
    #[strum(serialize = "fish")]
    Fish,
    #[strum(serialize = "sake")]
    Sake,
    #[strum(serialize = "sea king meat")]
    SeaKingMeat,
}

impl HealItem {
    /// Percent of max health restored, depending on whether the target is a
    /// Support card.
    pub const fn heal_percent(self, support: bool) -> u32 {
        match (self, support) {
            (Self::Meat, false) => 10,
            (Self::Meat, true) => 5,
            (Self::Fish, false) => 5,
            (Self::Fish, true) => 10,
            (Self::Sake, false) => 5,
            (Self::Sake, true) => 20,
            (Self::SeaKingMeat, false) => 20,
            (Self::SeaKingMeat, true) => 5,
        }
    }
}

/// Healing stock carried into a battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Supplies {
    counts: BTreeMap<HealItem, u32>,
}

impl Supplies {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, item: HealItem, count: u32) -> Self {
        self.set(item, count);
        self
    }

    pub fn set(&mut self, item: HealItem, count: u32) {
        if count == 0 {
            self.counts.remove(&item);
        } else {
            self.counts.insert(item, count);
        }
    }

    pub fn count(&self, item: HealItem) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Takes one unit of `item` out of stock.
    pub fn consume(&mut self, item: HealItem) -> bool {
        match self.counts.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&item);
                }
                true
            }
            _ => false,
        }
    }

    /// Items with at least one unit in stock.
    pub fn available(&self) -> impl Iterator<Item = HealItem> + '_ {
        self.counts.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Terminal result of a fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightOutcome {
    EnemiesCleared,
    TeamDefeated,
}

/// Mutable combat state for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub team: Vec<CombatantSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    /// Completed turns in the current fight.
    pub turn: u32,
    /// First living team slot; equals `team.len()` once everyone has fallen.
    pub life_index: usize,
    pub seed: u64,
    /// Roll counter feeding [`compute_seed`].
    pub nonce: u64,
    pub supplies: Supplies,
    /// Team slot that will intercept the next enemy hit for zero damage.
    pub guard: Option<usize>,
}

impl BattleState {
    pub fn new(team: Vec<CombatantSnapshot>, seed: u64, supplies: Supplies) -> Self {
        let mut state = Self {
            team,
            enemies: Vec::new(),
            turn: 0,
            life_index: 0,
            seed,
            nonce: 0,
            supplies,
            guard: None,
        };
        state.refresh_life_index();
        state
    }

    /// Replaces the roster with a freshly materialized fight and resets
    /// per-fight bookkeeping.
    pub fn begin_fight(&mut self, enemies: Vec<EnemySnapshot>) {
        self.enemies = enemies;
        self.turn = 0;
        self.guard = None;
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (usize, &EnemySnapshot)> {
        self.enemies.iter().enumerate().filter(|(_, e)| e.is_alive())
    }

    pub fn living_team(&self) -> impl Iterator<Item = (usize, &CombatantSnapshot)> {
        self.team.iter().enumerate().filter(|(_, c)| c.is_alive())
    }

    /// Slots the player may pick for an action this turn.
    pub fn selectable(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(_, c)| c.can_act())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn any_can_act(&self) -> bool {
        self.team.iter().any(CombatantSnapshot::can_act)
    }

    pub fn outcome(&self) -> Option<FightOutcome> {
        if self.team.iter().all(|c| !c.is_alive()) {
            Some(FightOutcome::TeamDefeated)
        } else if !self.enemies.is_empty() && self.enemies.iter().all(|e| !e.is_alive()) {
            Some(FightOutcome::EnemiesCleared)
        } else {
            None
        }
    }

    pub fn refresh_life_index(&mut self) {
        self.life_index = self
            .team
            .iter()
            .position(CombatantSnapshot::is_alive)
            .unwrap_or(self.team.len());
    }

    /// Seed for the next roll; advances the roll counter.
    pub fn next_seed(&mut self, slot: usize, context: RollContext) -> u64 {
        let seed = compute_seed(self.seed, self.nonce, slot as u32, context);
        self.nonce = self.nonce.wrapping_add(1);
        seed
    }
}
