//! Reward planning: what a victory is worth and how experience turns into
//! levels. Committing the result to a player record is the runtime's job.
mod progression;
mod table;

pub use progression::{Progress, level_chest_chance, level_up_grants};
pub use table::{ChestRank, Grant, RewardEntry, RewardKind, RewardTable};
