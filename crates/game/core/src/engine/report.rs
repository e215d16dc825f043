use crate::action::Technique;
use crate::state::{FightOutcome, HealItem};

/// Something observable that happened while resolving a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnEvent {
    PlayerHit {
        actor: usize,
        target: usize,
        damage: u32,
        special: Option<String>,
        defeated: bool,
    },
    Healed {
        item: HealItem,
        target: usize,
        amount: u32,
        /// Teammates who lost stamina to the heal.
        drained: Vec<usize>,
    },
    TechniqueUsed {
        actor: usize,
        technique: Technique,
    },
    Executed {
        actor: usize,
        target: usize,
    },
    Overwhelmed {
        actor: usize,
        hits: Vec<(usize, u32)>,
    },
    EnemyHit {
        enemy: usize,
        target: usize,
        damage: u32,
        special: Option<String>,
    },
    Dodged {
        enemy: usize,
        target: usize,
        guaranteed: bool,
    },
    Guarded {
        enemy: usize,
        intended: usize,
        ally: usize,
    },
    TeammateDown {
        slot: usize,
    },
    /// Nobody on the team could act, so the enemies attacked unopposed.
    Stalemate,
}

/// Result of one resolver call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub events: Vec<TurnEvent>,
    pub outcome: Option<FightOutcome>,
    /// False for techniques, which leave the turn open.
    pub turn_ended: bool,
}

impl TurnReport {
    /// Total damage the enemies landed on the team.
    pub fn damage_taken(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                TurnEvent::EnemyHit { damage, .. } => *damage,
                _ => 0,
            })
            .sum()
    }

    pub fn enemy_swings(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    TurnEvent::EnemyHit { .. } | TurnEvent::Dodged { .. } | TurnEvent::Guarded { .. }
                )
            })
            .count()
    }
}
