//! Player commands accepted by the turn resolver.
//!
//! Slots index into [`crate::state::BattleState::team`] and
//! [`crate::state::BattleState::enemies`]. Enemy targets are optional: when
//! exactly one enemy is alive the resolver picks it.
mod error;

pub use error::ActionError;

use crate::config::TechniqueCosts;
use crate::state::HealItem;

/// One player choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    Attack {
        actor: usize,
        target: Option<usize>,
    },
    Special {
        actor: usize,
        target: Option<usize>,
    },
    Heal {
        item: HealItem,
        target: usize,
    },
    Technique {
        actor: usize,
        technique: Technique,
    },
}

impl BattleAction {
    /// Whether the action uses the turn's action slot and triggers the enemy
    /// response. Techniques do not.
    pub const fn ends_turn(&self) -> bool {
        !matches!(self, Self::Technique { .. })
    }

    pub const fn actor(&self) -> Option<usize> {
        match *self {
            Self::Attack { actor, .. }
            | Self::Special { actor, .. }
            | Self::Technique { actor, .. } => Some(actor),
            Self::Heal { .. } => None,
        }
    }
}

/// The three ability schools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HakiSchool {
    Armament,
    Observation,
    Conqueror,
}

/// Haki techniques. None of them end the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Technique {
    /// The next incoming hit on the actor misses.
    Foresight,
    /// The next incoming enemy hit lands on `ally` for zero damage.
    Guard { ally: usize },
    /// Finishes an enemy at or below the star-scaled health threshold.
    Execute { target: Option<usize> },
    /// Star-scaled percentage damage to every living enemy.
    Overwhelm,
}

impl Technique {
    pub const fn school(&self) -> HakiSchool {
        match self {
            Self::Foresight => HakiSchool::Observation,
            Self::Guard { .. } => HakiSchool::Armament,
            Self::Execute { .. } | Self::Overwhelm => HakiSchool::Conqueror,
        }
    }

    pub const fn cost(&self, costs: &TechniqueCosts) -> u8 {
        match self {
            Self::Foresight => costs.foresight,
            Self::Guard { .. } => costs.guard,
            Self::Execute { .. } => costs.execute,
            Self::Overwhelm => costs.overwhelm,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Foresight => "Foresight",
            Self::Guard { .. } => "Guard",
            Self::Execute { .. } => "Execute",
            Self::Overwhelm => "Overwhelm",
        }
    }
}
