//! Content factory for loading battle content from a data directory.

use std::path::{Path, PathBuf};

use game_core::{BattleConfig, EpisodeScript, RewardKind, StageKind};

use crate::loaders::{
    BuiltinContent, CatalogData, CatalogLoader, ConfigLoader, EpisodeLoader, LoadResult,
};

/// Everything a battle runtime needs, loaded and cross-checked.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub catalog: CatalogData,
    pub episodes: Vec<EpisodeScript>,
    pub config: BattleConfig,
}

impl ContentBundle {
    /// The compiled-in content set.
    pub fn builtin() -> LoadResult<Self> {
        let bundle = Self {
            catalog: BuiltinContent::catalog()?,
            episodes: BuiltinContent::episodes()?,
            config: BuiltinContent::config()?,
        };
        bundle.check_references()?;
        Ok(bundle)
    }

    /// Every card named by a reward table must exist in the catalog.
    pub fn check_references(&self) -> LoadResult<()> {
        for episode in &self.episodes {
            let fight_tables = episode.stages.iter().filter_map(|stage| match &stage.kind {
                StageKind::Fight {
                    rewards: Some(table),
                    ..
                } => Some(table),
                _ => None,
            });
            for table in std::iter::once(&episode.rewards).chain(fight_tables) {
                for entry in &table.entries {
                    if let RewardKind::Card { card_id } = &entry.kind
                        && self.catalog.card(card_id).is_none()
                    {
                        anyhow::bail!(
                            "Episode {} rewards unknown card '{}'",
                            episode.number,
                            card_id
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── cards.ron
/// └── episodes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle tuning from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("battle.toml"))
    }

    /// Load cards, gear, and banners from `cards.ron`.
    pub fn load_catalog(&self) -> LoadResult<CatalogData> {
        CatalogLoader::load(&self.data_dir.join("cards.ron"))
    }

    /// Load the episode book from `episodes.ron`.
    pub fn load_episodes(&self) -> LoadResult<Vec<EpisodeScript>> {
        EpisodeLoader::load(&self.data_dir.join("episodes.ron"))
    }

    /// Load and cross-check all three files.
    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            catalog: self.load_catalog()?,
            episodes: self.load_episodes()?,
            config: self.load_config()?,
        };
        bundle.check_references()?;
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builtin_bundle_is_consistent() {
        let bundle = ContentBundle::builtin().unwrap();
        assert!(!bundle.catalog.cards.is_empty());
    }
}
