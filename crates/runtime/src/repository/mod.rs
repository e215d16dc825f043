//! Repository layer for persisted player data.
//!
//! Repositories hold data that CHANGES across battles: currency, chests,
//! cards, episode progress, defeat cooldowns. Static battle content (cards,
//! episodes, tuning) is handled by oracles, not repositories.

mod error;
mod file;
mod memory;
mod record;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FilePlayerRepository;
pub use memory::InMemoryPlayerRepository;
pub use record::{
    CardProgress, ChestCounts, DefeatRecord, EpisodeProgress, GearItem, PlayerRecord,
};
pub use traits::PlayerRepository;
