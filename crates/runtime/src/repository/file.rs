//! File-based PlayerRepository storing one JSON document per owner.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{PlayerRecord, PlayerRepository, RepositoryError, Result};

/// Stores records as `{owner}.json` under a base directory.
///
/// Writes go to a temp file first and are renamed into place, so a crash never
/// leaves a half-written record behind.
pub struct FilePlayerRepository {
    base_dir: PathBuf,
}

impl FilePlayerRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn record_path(&self, owner: &str) -> PathBuf {
        // owner ids are opaque; keep them from escaping the directory
        let safe: String = owner
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl PlayerRepository for FilePlayerRepository {
    async fn find(&self, owner: &str) -> Result<Option<PlayerRecord>> {
        let path = self.record_path(owner);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepositoryError::Io(e)),
        };
        let record =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;
        tracing::debug!(owner, path = %path.display(), "Loaded player record");
        Ok(Some(record))
    }

    async fn upsert(&self, record: &PlayerRecord) -> Result<()> {
        let path = self.record_path(&record.owner);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;
        tokio::fs::write(&temp_path, bytes).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        tracing::debug!(owner = %record.owner, path = %path.display(), "Saved player record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use game_core::ChestRank;

    use super::*;

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePlayerRepository::new(dir.path()).unwrap();

        let mut record = PlayerRecord::new("user/42");
        record.add_chests(ChestRank::A, 2);
        record.team = vec!["luffy".into()];
        repo.upsert(&record).await.unwrap();

        let loaded = repo.find("user/42").await.unwrap().unwrap();
        assert_eq!(loaded, record);
        assert!(dir.path().join("user_42.json").exists());
        assert!(repo.find("nobody").await.unwrap().is_none());
    }
}
