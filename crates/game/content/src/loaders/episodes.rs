//! Episode script loader.

use std::path::Path;

use game_core::{EpisodeScript, StageKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Episode book structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeBookData {
    pub episodes: Vec<EpisodeScript>,
}

/// Loader for episode scripts from RON files.
pub struct EpisodeLoader;

impl EpisodeLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EpisodeScript>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a book of episodes.
    ///
    /// Episodes must be numbered 1, 2, 3... in order, have at least one stage,
    /// and every fight must field at least one enemy. Reaction meters need a
    /// non-zero tick.
    pub fn parse(content: &str) -> LoadResult<Vec<EpisodeScript>> {
        let book: EpisodeBookData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse episode RON: {}", e))?;

        for (idx, episode) in book.episodes.iter().enumerate() {
            let expected = idx as u32 + 1;
            if episode.number != expected {
                anyhow::bail!(
                    "Episode '{}' is numbered {} but should be {}",
                    episode.title,
                    episode.number,
                    expected
                );
            }
            if episode.stages.is_empty() {
                anyhow::bail!("Episode {} has no stages", episode.number);
            }
            for (stage_idx, stage) in episode.stages.iter().enumerate() {
                match &stage.kind {
                    StageKind::Fight { enemies, .. } if enemies.is_empty() => {
                        anyhow::bail!(
                            "Episode {} stage {} is a fight with no enemies",
                            episode.number,
                            stage_idx
                        );
                    }
                    StageKind::TimedReaction(spec) if spec.tick_ms == 0 => {
                        anyhow::bail!(
                            "Episode {} stage {} has a zero reaction tick",
                            episode.number,
                            stage_idx
                        );
                    }
                    _ => {}
                }
            }
        }

        Ok(book.episodes)
    }
}
