//! Runtime wrappers around static battle content.
//!
//! These implementations expose the `game-core` oracle traits and bundle them
//! into an [`OracleManager`] that every session worker shares. The data is
//! immutable at runtime; per-player state lives in the repository.
mod catalog;
mod episodes;

use std::sync::Arc;

use game_content::{ContentBundle, ContentFactory, LoadResult};
use game_core::{BattleConfig, CatalogOracle, EpisodeOracle, PcgRng, RngOracle};

pub use catalog::CatalogOracleImpl;
pub use episodes::EpisodeOracleImpl;

/// Shared, read-only content plus the dice.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) catalog: Arc<CatalogOracleImpl>,
    pub(crate) episodes: Arc<EpisodeOracleImpl>,
    pub(crate) config: Arc<BattleConfig>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(catalog: CatalogOracleImpl, episodes: EpisodeOracleImpl, config: BattleConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            episodes: Arc::new(episodes),
            config: Arc::new(config),
            rng: PcgRng,
        }
    }

    pub fn from_bundle(bundle: ContentBundle) -> Self {
        Self::new(
            CatalogOracleImpl::from_data(&bundle.catalog),
            EpisodeOracleImpl::new(bundle.episodes),
            bundle.config,
        )
    }

    /// The compiled-in content set.
    pub fn builtin() -> LoadResult<Self> {
        ContentBundle::builtin().map(Self::from_bundle)
    }

    /// Loads content from `battle.toml`, `cards.ron` and `episodes.ron` in `dir`.
    pub fn from_dir(dir: impl Into<std::path::PathBuf>) -> LoadResult<Self> {
        ContentFactory::new(dir).load_all().map(Self::from_bundle)
    }

    pub fn catalog(&self) -> &dyn CatalogOracle {
        self.catalog.as_ref()
    }

    pub fn episodes(&self) -> &dyn EpisodeOracle {
        self.episodes.as_ref()
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn rng(&self) -> &dyn RngOracle {
        &self.rng
    }
}
