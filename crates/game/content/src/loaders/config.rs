//! Battle tuning loader.

use std::path::Path;

use game_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`BattleConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load battle tuning from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;

        if config.max_stamina == 0 {
            anyhow::bail!("max_stamina must be at least 1");
        }
        if config.special_cost > config.max_stamina {
            anyhow::bail!(
                "special_cost {} exceeds max_stamina {}",
                config.special_cost,
                config.max_stamina
            );
        }
        if config.xp_per_level == 0 {
            anyhow::bail!("xp_per_level must be at least 1");
        }

        Ok(config)
    }
}
