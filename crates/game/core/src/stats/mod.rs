//! Stat snapshot builder.
//!
//! Converts persisted card, progress, and equipment data into the numbers a
//! battle runs on. All team stats flow through one ordered modifier list in
//! [`pipeline`]; enemy scaling lives in [`enemy`].
pub mod builder;
pub mod enemy;
pub mod pipeline;

pub use builder::{
    BuildError, EquippedGear, SnapshotInput, TeamMember, TeamSpec, build_combatant, build_team,
    modifier_stages,
};
pub use enemy::scale_enemy;
pub use pipeline::{ModifierStage, WorkingStats, apply_stages, round_to_five};
