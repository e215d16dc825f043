use crate::episode::Difficulty;

/// Battle tuning constants and tunable parameters.
///
/// Percentages are stored as whole numbers (`25` = 25%) so the struct stays
/// `Eq` and round-trips through TOML without float noise.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Stamina ceiling for every combatant.
    pub max_stamina: u8,
    pub basic_attack_cost: u8,
    pub special_cost: u8,
    /// Stamina lost by every other living teammate when a heal is used.
    pub heal_stamina_penalty: u8,
    pub techniques: TechniqueCosts,

    // ===== stat pipeline =====
    pub level_bonus_percent: u32,
    pub gear_level_bonus_percent: u32,
    pub signature_bonus_percent: u32,
    pub banner_bonus_percent: u32,
    pub armament_percent_per_star: u32,
    pub observation_dodge_percent_per_star: u32,

    // ===== techniques =====
    pub execute_percent_per_star: u32,
    pub execute_cap_percent: u32,
    pub overwhelm_percent_per_star: u32,

    /// Enemy stat multiplier, in percent, per difficulty tier.
    pub difficulty_percent: PerDifficulty<u32>,

    // ===== progression =====
    /// Experience granted to a card instead of a duplicate copy.
    pub duplicate_card_xp: u32,
    pub xp_per_level: u32,
    /// One-time experience for clearing an episode at a given tier.
    pub episode_xp: PerDifficulty<u32>,
    pub level_up_currency_per_level: u64,

    /// Slack after a reaction meter's duration during which a signal still counts.
    pub reaction_grace_ms: u64,
}

impl BattleConfig {
    pub const DEFAULT_MAX_STAMINA: u8 = 3;
    pub const DEFAULT_SPECIAL_COST: u8 = 3;
    pub const DEFAULT_DUPLICATE_CARD_XP: u32 = 100;
    pub const DEFAULT_XP_PER_LEVEL: u32 = 100;
    pub const DEFAULT_REACTION_GRACE_MS: u64 = 500;

    pub fn new() -> Self {
        Self {
            max_stamina: Self::DEFAULT_MAX_STAMINA,
            basic_attack_cost: 1,
            special_cost: Self::DEFAULT_SPECIAL_COST,
            heal_stamina_penalty: 1,
            techniques: TechniqueCosts::default(),
            level_bonus_percent: 1,
            gear_level_bonus_percent: 1,
            signature_bonus_percent: 25,
            banner_bonus_percent: 5,
            armament_percent_per_star: 5,
            observation_dodge_percent_per_star: 5,
            execute_percent_per_star: 10,
            execute_cap_percent: 50,
            overwhelm_percent_per_star: 5,
            difficulty_percent: PerDifficulty::new(100, 125, 150),
            duplicate_card_xp: Self::DEFAULT_DUPLICATE_CARD_XP,
            xp_per_level: Self::DEFAULT_XP_PER_LEVEL,
            episode_xp: PerDifficulty::new(10, 20, 30),
            level_up_currency_per_level: 50,
            reaction_grace_ms: Self::DEFAULT_REACTION_GRACE_MS,
        }
    }

    /// Enemy multiplier for a tier as a float (`1.25` for medium by default).
    pub fn difficulty_multiplier(&self, difficulty: Difficulty) -> f64 {
        f64::from(*self.difficulty_percent.get(difficulty)) / 100.0
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamina cost of each haki technique.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TechniqueCosts {
    pub foresight: u8,
    pub guard: u8,
    pub execute: u8,
    pub overwhelm: u8,
}

impl Default for TechniqueCosts {
    fn default() -> Self {
        Self {
            foresight: 1,
            guard: 2,
            execute: 2,
            overwhelm: 2,
        }
    }
}

/// A value keyed by difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerDifficulty<T> {
    pub easy: T,
    pub medium: T,
    pub hard: T,
}

impl<T> PerDifficulty<T> {
    pub const fn new(easy: T, medium: T, hard: T) -> Self {
        Self { easy, medium, hard }
    }

    pub fn get(&self, difficulty: Difficulty) -> &T {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}
