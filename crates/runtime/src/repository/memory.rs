//! In-memory PlayerRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{PlayerRecord, PlayerRepository, RepositoryError, Result};

/// In-memory implementation of [`PlayerRepository`].
///
/// Records are lost when the process exits.
pub struct InMemoryPlayerRepository {
    records: RwLock<HashMap<String, PlayerRecord>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Create a repository seeded with `records`.
    pub fn with_records(records: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.owner.clone(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn find(&self, owner: &str) -> Result<Option<PlayerRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(owner).cloned())
    }

    async fn upsert(&self, record: &PlayerRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.owner.clone(), record.clone());
        Ok(())
    }
}
