//! Ordered modifier stages applied to a card's base stats.
//!
//! Every stat a combatant carries into battle is produced by folding one
//! explicit list of [`ModifierStage`]s over [`WorkingStats`]. The order of the
//! list is the order of application:
//!
//! ```text
//! Base → Level → Gear → TeamBoost → Banner → Haki → RoundToFive
//! ```
//!
//! Each multiplicative stage rounds to the nearest integer as it goes, so the
//! outcome depends on the order and must not be reshuffled.

use crate::env::TeamBoost;

/// A single step of the stat pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierStage {
    /// `× (1 + level · percent_per_level / 100)` on every stat, special included.
    Level { level: u32, percent_per_level: u32 },

    /// Flat gear bonus already scaled by gear level and signature bond.
    /// `atk` lands on power and both ends of the attack range.
    Gear { atk: u32, hp: u32 },

    /// Team-wide percentages: atk → attack range and power, hp → health,
    /// special → special range.
    TeamBoost(TeamBoost),

    /// Banner passive, `× (1 + percent / 100)` on attack, power, and health.
    Banner { percent: u32 },

    /// Armament multiplier on attack, power, and health; observation dodge.
    Haki {
        armament_percent: u32,
        dodge_percent: u32,
    },

    /// Snap every stat to the nearest multiple of five.
    RoundToFive,
}

/// Intermediate stat values while the pipeline runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorkingStats {
    pub health: f64,
    pub attack_min: f64,
    pub attack_max: f64,
    pub power: f64,
    pub special: Option<(f64, f64)>,
    pub dodge_percent: u32,
}

impl WorkingStats {
    fn scale_offense(&mut self, factor: f64) {
        self.attack_min = (self.attack_min * factor).round();
        self.attack_max = (self.attack_max * factor).round();
        self.power = (self.power * factor).round();
    }

    /// Final integer health, never below zero.
    pub fn health_u32(&self) -> u32 {
        to_u32(self.health)
    }

    pub fn attack_u32(&self) -> (u32, u32) {
        (to_u32(self.attack_min), to_u32(self.attack_max))
    }

    pub fn power_u32(&self) -> u32 {
        to_u32(self.power)
    }

    pub fn special_u32(&self) -> Option<(u32, u32)> {
        self.special.map(|(min, max)| (to_u32(min), to_u32(max)))
    }
}

fn to_u32(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else {
        value.round() as u32
    }
}

fn percent_factor(percent: u32) -> f64 {
    1.0 + f64::from(percent) / 100.0
}

/// Rounds to the nearest multiple of five, halves rounding up.
pub fn round_to_five(value: f64) -> f64 {
    (value / 5.0).round() * 5.0
}

impl ModifierStage {
    /// Applies this stage in place.
    pub fn apply(&self, stats: &mut WorkingStats) {
        match *self {
            ModifierStage::Level {
                level,
                percent_per_level,
            } => {
                let factor = 1.0 + f64::from(level) * f64::from(percent_per_level) / 100.0;
                stats.health = (stats.health * factor).round();
                stats.scale_offense(factor);
                // left unrounded until the final snap
                stats.special = stats.special.map(|(min, max)| (min * factor, max * factor));
            }
            ModifierStage::Gear { atk, hp } => {
                let atk = f64::from(atk);
                stats.power += atk;
                stats.attack_min += atk;
                stats.attack_max += atk;
                stats.health += f64::from(hp);
            }
            ModifierStage::TeamBoost(boost) => {
                if boost.atk > 0 {
                    stats.scale_offense(percent_factor(boost.atk));
                }
                if boost.hp > 0 {
                    stats.health = (stats.health * percent_factor(boost.hp)).round();
                }
                if boost.special > 0 {
                    let factor = percent_factor(boost.special);
                    stats.special = stats
                        .special
                        .map(|(min, max)| ((min * factor).round(), (max * factor).round()));
                }
            }
            ModifierStage::Banner { percent } => {
                let factor = percent_factor(percent);
                stats.scale_offense(factor);
                stats.health = (stats.health * factor).round();
            }
            ModifierStage::Haki {
                armament_percent,
                dodge_percent,
            } => {
                if armament_percent > 0 {
                    let factor = percent_factor(armament_percent);
                    stats.scale_offense(factor);
                    stats.health = (stats.health * factor).round();
                }
                stats.dodge_percent = dodge_percent;
            }
            ModifierStage::RoundToFive => {
                stats.health = round_to_five(stats.health.round());
                stats.attack_min = round_to_five(stats.attack_min.round());
                stats.attack_max = round_to_five(stats.attack_max.round());
                stats.power = round_to_five(stats.power.round());
                stats.special = stats
                    .special
                    .map(|(min, max)| (round_to_five(min.round()), round_to_five(max.round())));
            }
        }
    }
}

/// Folds `stages` over `base` in order.
pub fn apply_stages(base: WorkingStats, stages: &[ModifierStage]) -> WorkingStats {
    stages.iter().fold(base, |mut stats, stage| {
        stage.apply(&mut stats);
        stats
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> WorkingStats {
        WorkingStats {
            health: 100.0,
            attack_min: 10.0,
            attack_max: 20.0,
            power: 15.0,
            special: Some((40.0, 50.0)),
            dodge_percent: 0,
        }
    }

    #[test]
    fn round_to_five_halves_up() {
        assert_eq!(round_to_five(12.0), 10.0);
        assert_eq!(round_to_five(12.5), 15.0);
        assert_eq!(round_to_five(13.0), 15.0);
        assert_eq!(round_to_five(0.0), 0.0);
    }

    #[test]
    fn level_scales_special_without_rounding() {
        let stats = apply_stages(
            base(),
            &[ModifierStage::Level {
                level: 5,
                percent_per_level: 1,
            }],
        );
        assert_eq!(stats.health, 105.0);
        assert_eq!(stats.attack_min, 11.0); // 10.5 rounds up
        assert_eq!(stats.attack_max, 21.0);
        assert_eq!(stats.power, 16.0); // 15.75
        let (min, max) = stats.special.unwrap();
        assert!((min - 42.0).abs() < 1e-9);
        assert!((max - 52.5).abs() < 1e-9);
    }

    #[test]
    fn gear_adds_attack_to_power_and_range() {
        let stats = apply_stages(base(), &[ModifierStage::Gear { atk: 7, hp: 12 }]);
        assert_eq!(stats.power, 22.0);
        assert_eq!(stats.attack_min, 17.0);
        assert_eq!(stats.attack_max, 27.0);
        assert_eq!(stats.health, 112.0);
    }

    #[test]
    fn team_boost_only_touches_its_axes() {
        let stats = apply_stages(
            base(),
            &[ModifierStage::TeamBoost(TeamBoost {
                atk: 10,
                hp: 0,
                special: 20,
            })],
        );
        assert_eq!(stats.health, 100.0);
        assert_eq!(stats.attack_max, 22.0);
        assert_eq!(stats.special, Some((48.0, 60.0)));
    }

    #[test]
    fn order_matters() {
        let gear_then_banner = apply_stages(
            base(),
            &[
                ModifierStage::Gear { atk: 10, hp: 0 },
                ModifierStage::Banner { percent: 50 },
            ],
        );
        let banner_then_gear = apply_stages(
            base(),
            &[
                ModifierStage::Banner { percent: 50 },
                ModifierStage::Gear { atk: 10, hp: 0 },
            ],
        );
        assert_ne!(gear_then_banner.power, banner_then_gear.power);
    }

    #[test]
    fn haki_sets_dodge_and_scales_health() {
        let stats = apply_stages(
            base(),
            &[ModifierStage::Haki {
                armament_percent: 10,
                dodge_percent: 15,
            }],
        );
        assert_eq!(stats.health, 110.0);
        assert_eq!(stats.power, 17.0); // 16.5
        assert_eq!(stats.dodge_percent, 15);
    }

    #[test]
    fn final_snap_rounds_everything() {
        let mut stats = base();
        stats.health = 103.0;
        stats.power = 17.4;
        stats.special = Some((42.0, 52.5));
        let stats = apply_stages(stats, &[ModifierStage::RoundToFive]);
        assert_eq!(stats.health_u32(), 105);
        assert_eq!(stats.power_u32(), 15);
        assert_eq!(stats.special_u32(), Some((40, 55)));
    }
}
