//! Builds combat-ready [`CombatantSnapshot`]s from catalog data and the
//! owner's progress.

use crate::config::BattleConfig;
use crate::env::{CardDefinition, CatalogOracle, GearDefinition, TeamBoost};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantFlags, CombatantSnapshot, DamageRange, SpecialAttack};

use super::pipeline::{ModifierStage, WorkingStats, apply_stages};

/// Errors raised while assembling a team.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("team is empty; add cards to your team before starting an episode")]
    EmptyTeam,

    #[error("card `{0}` is not in the catalog")]
    UnknownCard(String),
}

impl GameError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTeam => "BUILD_EMPTY_TEAM",
            Self::UnknownCard(_) => "BUILD_UNKNOWN_CARD",
        }
    }
}

/// Gear equipped on a team member, as stored in the owner's inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquippedGear {
    pub gear_id: String,
    pub level: u32,
}

/// One team slot as read from the owner's record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamMember {
    pub card_id: String,
    pub level: u32,
    pub gear: Option<EquippedGear>,
}

impl TeamMember {
    pub fn new(card_id: impl Into<String>, level: u32) -> Self {
        Self {
            card_id: card_id.into(),
            level,
            gear: None,
        }
    }

    #[must_use]
    pub fn with_gear(mut self, gear_id: impl Into<String>, level: u32) -> Self {
        self.gear = Some(EquippedGear {
            gear_id: gear_id.into(),
            level,
        });
        self
    }
}

/// Everything the builder needs about the owner's team.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamSpec {
    pub members: Vec<TeamMember>,
    /// Active banner id, if the owner has one equipped.
    pub banner: Option<String>,
}

/// Inputs for a single card's pipeline.
pub struct SnapshotInput<'a> {
    pub card: &'a CardDefinition,
    pub level: u32,
    pub gear: Option<(&'a GearDefinition, u32)>,
    pub team_boost: TeamBoost,
    pub banner_active: bool,
}

/// Flat gear bonus after level and signature scaling.
///
/// Gear only applies when it is the card's signature gear.
fn gear_bonus(
    card: &CardDefinition,
    gear: &GearDefinition,
    gear_level: u32,
    config: &BattleConfig,
) -> Option<(u32, u32)> {
    if card.signature_gear.as_deref() != Some(gear.id.as_str()) {
        return None;
    }

    let level_bonus = f64::from(gear_level.max(1) - 1) * f64::from(config.gear_level_bonus_percent);
    let signature = if gear.grants_signature_bonus(&card.id) {
        f64::from(config.signature_bonus_percent)
    } else {
        0.0
    };
    let factor = 1.0 + (level_bonus + signature) / 100.0;

    let atk = (f64::from(gear.boost.atk) * factor).round() as u32;
    let hp = (f64::from(gear.boost.hp) * factor).round() as u32;
    Some((atk, hp))
}

/// The ordered stage list for one card.
pub fn modifier_stages(input: &SnapshotInput<'_>, config: &BattleConfig) -> Vec<ModifierStage> {
    let mut stages = vec![ModifierStage::Level {
        level: input.level,
        percent_per_level: config.level_bonus_percent,
    }];

    if let Some((atk, hp)) = input
        .gear
        .and_then(|(gear, level)| gear_bonus(input.card, gear, level, config))
    {
        stages.push(ModifierStage::Gear { atk, hp });
    }

    if !input.team_boost.is_empty() {
        stages.push(ModifierStage::TeamBoost(input.team_boost));
    }

    if input.banner_active {
        stages.push(ModifierStage::Banner {
            percent: config.banner_bonus_percent,
        });
    }

    let haki = input.card.haki;
    stages.push(ModifierStage::Haki {
        armament_percent: u32::from(haki.armament) * config.armament_percent_per_star,
        dodge_percent: u32::from(haki.observation) * config.observation_dodge_percent_per_star,
    });

    stages.push(ModifierStage::RoundToFive);
    stages
}

/// Runs the pipeline for one card.
pub fn build_combatant(input: &SnapshotInput<'_>, config: &BattleConfig) -> CombatantSnapshot {
    let card = input.card;
    let base = WorkingStats {
        health: f64::from(card.health),
        attack_min: f64::from(card.attack.min),
        attack_max: f64::from(card.attack.max),
        power: f64::from(card.power),
        special: card
            .special
            .as_ref()
            .map(|s| (f64::from(s.range.min), f64::from(s.range.max))),
        dodge_percent: 0,
    };

    let stats = apply_stages(base, &modifier_stages(input, config));
    let (attack_min, attack_max) = stats.attack_u32();
    let health = stats.health_u32();

    let special = card.special.as_ref().zip(stats.special_u32()).map(|(def, (min, max))| {
        SpecialAttack {
            name: def.name.clone(),
            range: DamageRange::new(min, max),
        }
    });

    CombatantSnapshot {
        card_id: card.id.clone(),
        name: card.name.clone(),
        role: card.role,
        level: input.level,
        health,
        max_health: health,
        stamina: config.max_stamina,
        attack: DamageRange::new(attack_min, attack_max),
        power: stats.power_u32(),
        special,
        haki: card.haki,
        dodge_percent: stats.dodge_percent.min(100),
        flags: CombatantFlags::empty(),
    }
}

/// Builds the whole team in roster order.
///
/// Unknown gear or banners are ignored; an unknown card aborts the build.
pub fn build_team(
    spec: &TeamSpec,
    catalog: &dyn CatalogOracle,
    config: &BattleConfig,
) -> Result<Vec<CombatantSnapshot>, BuildError> {
    if spec.members.is_empty() {
        return Err(BuildError::EmptyTeam);
    }

    let cards = spec
        .members
        .iter()
        .map(|member| {
            catalog
                .card(&member.card_id)
                .ok_or_else(|| BuildError::UnknownCard(member.card_id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let team_boost: TeamBoost = cards.iter().map(|card| card.boost).sum();
    let banner = spec.banner.as_deref().and_then(|id| catalog.banner(id));

    let team = spec
        .members
        .iter()
        .zip(&cards)
        .map(|(member, card)| {
            let gear = member
                .gear
                .as_ref()
                .and_then(|g| catalog.gear(&g.gear_id).map(|def| (def, g.level)));
            let input = SnapshotInput {
                card,
                level: member.level,
                gear: gear.as_ref().map(|(def, level)| (def, *level)),
                team_boost,
                banner_active: banner.as_ref().is_some_and(|b| b.covers(&card.id)),
            };
            build_combatant(&input, config)
        })
        .collect();

    Ok(team)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{card, sample_catalog};
    use super::*;

    #[test]
    fn bare_card_only_rounds() {
        let def = card("koby", 52, (7, 12), 9);
        let input = SnapshotInput {
            card: &def,
            level: 0,
            gear: None,
            team_boost: TeamBoost::default(),
            banner_active: false,
        };
        let snapshot = build_combatant(&input, &BattleConfig::default());
        assert_eq!(snapshot.health, 50);
        assert_eq!(snapshot.max_health, 50);
        assert_eq!(snapshot.attack, DamageRange::new(5, 10));
        assert_eq!(snapshot.power, 10);
        assert_eq!(snapshot.stamina, 3);
        assert_eq!(snapshot.dodge_percent, 0);
    }

    #[test]
    fn full_pipeline_for_luffy() {
        let catalog = sample_catalog();
        let spec = TeamSpec {
            members: vec![
                TeamMember::new("luffy", 10).with_gear("straw_hat", 11),
                TeamMember::new("nami", 0),
            ],
            banner: Some("alvida".into()),
        };
        let team = build_team(&spec, &catalog, &BattleConfig::default()).unwrap();
        let luffy = &team[0];

        // level ×1.10: hp 110, atk 11-22, power 22, special 44-55
        // gear 10/20 × (1 + 0.10 + 0.25) = 14 / 27: hp 137, atk 25-36, power 36
        // team atk +10% (nami): atk 28-40, power 40 (39.6)
        // banner: luffy not on roster
        // armament 2★ ×1.10: atk 31-44, power 44, hp 151
        // round to five: atk 30-45, power 45, hp 150, special 45-55
        assert_eq!(luffy.health, 150);
        assert_eq!(luffy.attack, DamageRange::new(30, 45));
        assert_eq!(luffy.power, 45);
        assert_eq!(luffy.special.as_ref().unwrap().range, DamageRange::new(45, 55));
        assert_eq!(luffy.dodge_percent, 5);

        // nami: atk 5-10 ×1.1 → 6-11, power 9; banner ×1.05 → 6-12, power 9, hp 84
        // round: 5-10, power 10, hp 85
        let nami = &team[1];
        assert_eq!(nami.health, 85);
        assert_eq!(nami.attack, DamageRange::new(5, 10));
        assert_eq!(nami.power, 10);
    }

    #[test]
    fn gear_for_another_card_is_ignored() {
        let catalog = sample_catalog();
        let spec = TeamSpec {
            members: vec![TeamMember::new("nami", 0).with_gear("straw_hat", 1)],
            banner: None,
        };
        let team = build_team(&spec, &catalog, &BattleConfig::default()).unwrap();
        // 80 hp, no gear, team atk +10% from nami herself
        assert_eq!(team[0].health, 80);
    }

    #[test]
    fn unknown_card_aborts() {
        let catalog = sample_catalog();
        let spec = TeamSpec {
            members: vec![TeamMember::new("usopp", 1)],
            banner: None,
        };
        assert_eq!(
            build_team(&spec, &catalog, &BattleConfig::default()),
            Err(BuildError::UnknownCard("usopp".into()))
        );
    }

    #[test]
    fn empty_team_aborts() {
        let catalog = sample_catalog();
        let err = build_team(&TeamSpec::default(), &catalog, &BattleConfig::default())
            .unwrap_err();
        assert_eq!(err, BuildError::EmptyTeam);
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn first_bond_gets_no_signature_bonus() {
        let catalog = sample_catalog();
        let mut shanks = card("shanks", 100, (10, 10), 10);
        shanks.signature_gear = Some("straw_hat".into());
        let gear = catalog.gear("straw_hat").unwrap();
        let config = BattleConfig::default();
        assert_eq!(gear_bonus(&shanks, &gear, 1, &config), Some((10, 20)));
        let luffy = catalog.card("luffy").unwrap();
        assert_eq!(gear_bonus(&luffy, &gear, 1, &config), Some((13, 25)));
    }
}
