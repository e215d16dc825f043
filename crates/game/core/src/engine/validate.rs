//! Pre-validation for player actions.
//!
//! Every check runs before the resolver mutates anything, so a rejected
//! action leaves the battle state exactly as it was.

use crate::action::{ActionError, Technique};
use crate::config::BattleConfig;
use crate::state::{BattleState, CombatantFlags, CombatantSnapshot};

pub(super) fn combatant(state: &BattleState, slot: usize) -> Result<&CombatantSnapshot, ActionError> {
    state
        .team
        .get(slot)
        .ok_or(ActionError::UnknownCombatant { slot })
}

/// The actor must be alive, not exhausted, and not serving a forced skip.
pub(super) fn actor(state: &BattleState, slot: usize) -> Result<&CombatantSnapshot, ActionError> {
    let unit = combatant(state, slot)?;
    if !unit.is_alive() {
        return Err(ActionError::CombatantDown {
            name: unit.name.clone(),
        });
    }
    if !unit.can_act() {
        return Err(ActionError::CannotAct {
            name: unit.name.clone(),
        });
    }
    Ok(unit)
}

pub(super) fn stamina(unit: &CombatantSnapshot, required: u8) -> Result<(), ActionError> {
    if unit.stamina < required {
        return Err(ActionError::NotEnoughStamina {
            name: unit.name.clone(),
            required,
            available: unit.stamina,
        });
    }
    Ok(())
}

/// Resolves an enemy target, auto-selecting the sole survivor.
pub(super) fn enemy_target(state: &BattleState, target: Option<usize>) -> Result<usize, ActionError> {
    let mut living = state.living_enemies().map(|(idx, _)| idx);
    match target {
        Some(idx) => match state.enemies.get(idx) {
            Some(enemy) if enemy.is_alive() => Ok(idx),
            _ => Err(ActionError::InvalidTarget { target: idx }),
        },
        None => {
            let first = living.next().ok_or(ActionError::NoEnemies)?;
            if living.next().is_some() {
                return Err(ActionError::TargetRequired);
            }
            Ok(first)
        }
    }
}

pub(super) fn special(unit: &CombatantSnapshot, config: &BattleConfig) -> Result<(), ActionError> {
    if unit.special.is_none() {
        return Err(ActionError::NoSpecial {
            name: unit.name.clone(),
        });
    }
    if unit.flags.contains(CombatantFlags::USED_SPECIAL) {
        return Err(ActionError::SpecialAlreadyUsed {
            name: unit.name.clone(),
        });
    }
    stamina(unit, config.special_cost)
}

pub(super) fn technique(
    state: &BattleState,
    unit: &CombatantSnapshot,
    technique: Technique,
    config: &BattleConfig,
) -> Result<(), ActionError> {
    if unit.flags.contains(CombatantFlags::USED_TECHNIQUE) {
        return Err(ActionError::TechniqueAlreadyUsed {
            name: unit.name.clone(),
        });
    }

    let school = technique.school();
    let stars = match technique {
        Technique::Foresight => unit.haki.observation,
        Technique::Guard { .. } => unit.haki.armament,
        Technique::Execute { .. } | Technique::Overwhelm => unit.haki.conqueror,
    };
    if stars == 0 {
        return Err(ActionError::TechniqueLocked {
            name: unit.name.clone(),
            school,
        });
    }

    stamina(unit, technique.cost(&config.techniques))?;

    if let Technique::Guard { ally } = technique {
        match state.team.get(ally) {
            Some(guard) if guard.is_alive() => {}
            _ => return Err(ActionError::InvalidGuard { ally }),
        }
    }
    if matches!(technique, Technique::Overwhelm) && state.living_enemies().next().is_none() {
        return Err(ActionError::NoEnemies);
    }
    Ok(())
}
