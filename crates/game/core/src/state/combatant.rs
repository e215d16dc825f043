use bitflags::bitflags;

use crate::env::{CardRole, HakiProfile};

/// Inclusive integer damage range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

impl DamageRange {
    /// Builds a range, lifting `max` to `min` when the bounds are inverted.
    pub const fn new(min: u32, max: u32) -> Self {
        let max = if max < min { min } else { max };
        Self { min, max }
    }

    pub const fn fixed(value: u32) -> Self {
        Self::new(value, value)
    }
}

/// A combatant's once-per-battle special attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialAttack {
    pub name: String,
    pub range: DamageRange,
}

bitflags! {
    /// Per-turn and per-battle markers on a team combatant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatantFlags: u8 {
        const ATTACKED_LAST_TURN       = 1 << 0;
        const USED_SPECIAL             = 1 << 1;
        const SKIP_NEXT_TURN_PENDING   = 1 << 2;
        const SKIP_THIS_TURN           = 1 << 3;
        const GUARANTEED_DODGE_PENDING = 1 << 4;
        const USED_TECHNIQUE           = 1 << 5;
    }
}

/// Combat-ready projection of one team card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub card_id: String,
    pub name: String,
    pub role: CardRole,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub stamina: u8,
    pub attack: DamageRange,
    pub power: u32,
    pub special: Option<SpecialAttack>,
    pub haki: HakiProfile,
    /// Chance, in percent, that an incoming hit misses.
    pub dodge_percent: u32,
    pub flags: CombatantFlags,
}

impl CombatantSnapshot {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Whether the combatant may be offered in this turn's action menu.
    pub fn can_act(&self) -> bool {
        self.is_alive() && self.stamina > 0 && !self.flags.contains(CombatantFlags::SKIP_THIS_TURN)
    }

    pub fn is_support(&self) -> bool {
        self.role == CardRole::Support
    }

    pub fn special_available(&self) -> bool {
        self.special.is_some() && !self.flags.contains(CombatantFlags::USED_SPECIAL)
    }

    /// Subtracts up to `amount` health and returns what was actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        if self.health == 0 {
            self.stamina = 0;
        }
        dealt
    }

    /// Restores up to `amount` health without exceeding the maximum.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let missing = self.max_health.saturating_sub(self.health);
        let healed = amount.min(missing);
        self.health += healed;
        healed
    }

    /// Removes stamina without failing, flooring at zero.
    pub fn drain(&mut self, amount: u8) {
        self.stamina = self.stamina.saturating_sub(amount);
    }

    pub fn regain(&mut self, amount: u8, cap: u8) {
        self.stamina = self.stamina.saturating_add(amount).min(cap);
    }
}
