use crate::error::{ErrorSeverity, GameError};
use crate::state::HealItem;

use super::HakiSchool;

/// Reasons a player action is rejected. A rejected action leaves the battle
/// state untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no team member in slot {slot}")]
    UnknownCombatant { slot: usize },

    #[error("{name} has been knocked out")]
    CombatantDown { name: String },

    #[error("{name} cannot act this turn")]
    CannotAct { name: String },

    #[error("{name} needs {required} stamina but has {available}")]
    NotEnoughStamina {
        name: String,
        required: u8,
        available: u8,
    },

    #[error("{name} has no special attack")]
    NoSpecial { name: String },

    #[error("{name} already used their special attack this battle")]
    SpecialAlreadyUsed { name: String },

    #[error("choose an enemy to target")]
    TargetRequired,

    #[error("enemy slot {target} is not a valid target")]
    InvalidTarget { target: usize },

    #[error("no enemies are left standing")]
    NoEnemies,

    #[error("no {item} left in stock")]
    OutOfStock { item: HealItem },

    #[error("{name} lacks {school} haki")]
    TechniqueLocked { name: String, school: HakiSchool },

    #[error("{name} already used a technique this turn")]
    TechniqueAlreadyUsed { name: String },

    #[error("slot {ally} cannot guard")]
    InvalidGuard { ally: usize },

    #[error("{enemy} is at {health_percent}% health; execute needs {threshold}% or less")]
    AboveExecuteThreshold {
        enemy: String,
        health_percent: u32,
        threshold: u32,
    },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughStamina { .. }
            | Self::SpecialAlreadyUsed { .. }
            | Self::TechniqueAlreadyUsed { .. }
            | Self::AboveExecuteThreshold { .. }
            | Self::OutOfStock { .. }
            | Self::CannotAct { .. } => ErrorSeverity::Recoverable,
            Self::NoEnemies => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCombatant { .. } => "ACTION_UNKNOWN_COMBATANT",
            Self::CombatantDown { .. } => "ACTION_COMBATANT_DOWN",
            Self::CannotAct { .. } => "ACTION_CANNOT_ACT",
            Self::NotEnoughStamina { .. } => "ACTION_NOT_ENOUGH_STAMINA",
            Self::NoSpecial { .. } => "ACTION_NO_SPECIAL",
            Self::SpecialAlreadyUsed { .. } => "ACTION_SPECIAL_USED",
            Self::TargetRequired => "ACTION_TARGET_REQUIRED",
            Self::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            Self::NoEnemies => "ACTION_NO_ENEMIES",
            Self::OutOfStock { .. } => "ACTION_OUT_OF_STOCK",
            Self::TechniqueLocked { .. } => "ACTION_TECHNIQUE_LOCKED",
            Self::TechniqueAlreadyUsed { .. } => "ACTION_TECHNIQUE_USED",
            Self::InvalidGuard { .. } => "ACTION_INVALID_GUARD",
            Self::AboveExecuteThreshold { .. } => "ACTION_ABOVE_EXECUTE_THRESHOLD",
        }
    }
}
