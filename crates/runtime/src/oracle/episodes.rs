//! [`game_core::EpisodeOracle`] over a fixed set of scripts.
use std::collections::BTreeMap;

use game_core::{EpisodeOracle, EpisodeScript};

#[derive(Debug, Default)]
pub struct EpisodeOracleImpl {
    scripts: BTreeMap<u32, EpisodeScript>,
}

impl EpisodeOracleImpl {
    pub fn new(scripts: impl IntoIterator<Item = EpisodeScript>) -> Self {
        Self {
            scripts: scripts.into_iter().map(|s| (s.number, s)).collect(),
        }
    }

    /// Adds or replaces the script with the same number.
    pub fn insert(&mut self, script: EpisodeScript) {
        self.scripts.insert(script.number, script);
    }
}

impl EpisodeOracle for EpisodeOracleImpl {
    fn episode(&self, number: u32) -> Option<EpisodeScript> {
        self.scripts.get(&number).cloned()
    }

    fn last_episode(&self) -> u32 {
        self.scripts.keys().next_back().copied().unwrap_or(0)
    }
}
