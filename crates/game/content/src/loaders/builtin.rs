//! Content set compiled into the crate.
//!
//! Used when no data directory is configured, and by tests that need a full
//! episode book without touching the filesystem.

use game_core::{BattleConfig, EpisodeScript};

use crate::loaders::{CatalogData, CatalogLoader, ConfigLoader, EpisodeLoader, LoadResult};

const CARDS_RON: &str = include_str!("../../data/cards.ron");
const EPISODES_RON: &str = include_str!("../../data/episodes.ron");
const BATTLE_TOML: &str = include_str!("../../data/battle.toml");

pub struct BuiltinContent;

impl BuiltinContent {
    pub fn catalog() -> LoadResult<CatalogData> {
        CatalogLoader::parse(CARDS_RON)
    }

    pub fn episodes() -> LoadResult<Vec<EpisodeScript>> {
        EpisodeLoader::parse(EPISODES_RON)
    }

    pub fn config() -> LoadResult<BattleConfig> {
        ConfigLoader::parse(BATTLE_TOML)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_matches_defaults() {
        assert_eq!(BuiltinContent::config().unwrap(), BattleConfig::default());
    }

    #[test]
    fn builtin_episodes_parse() {
        let episodes = BuiltinContent::episodes().unwrap();
        assert_eq!(episodes.len(), 8);
        assert_eq!(episodes.last().map(|e| e.number), Some(8));
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = BuiltinContent::catalog().unwrap();
        assert!(catalog.card("luffy").is_some());
        assert_eq!(catalog.banners.len(), 2);
    }
}
