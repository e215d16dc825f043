//! Battle entities owned by a single session.
//!
//! Snapshots are projections computed at battle start; they are never written
//! back to the player's persisted cards.
mod battle;
pub(crate) mod combatant;
pub(crate) mod enemy;

pub use battle::{BattleState, FightOutcome, HealItem, Supplies};
pub use combatant::{CombatantFlags, CombatantSnapshot, DamageRange, SpecialAttack};
pub use enemy::{EnemySnapshot, EnemySpecial};
