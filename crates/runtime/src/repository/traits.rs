//! Repository contract for the external player record store.

use async_trait::async_trait;

use super::{PlayerRecord, Result};

/// Document store holding one [`PlayerRecord`] per owner.
///
/// `upsert` replaces the whole document, so a retried write is idempotent.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Load an owner's record, `None` if they have never played.
    async fn find(&self, owner: &str) -> Result<Option<PlayerRecord>>;

    /// Insert or replace an owner's record.
    async fn upsert(&self, record: &PlayerRecord) -> Result<()>;

    /// Load an owner's record or a fresh default one.
    async fn find_or_default(&self, owner: &str) -> Result<PlayerRecord> {
        Ok(self
            .find(owner)
            .await?
            .unwrap_or_else(|| PlayerRecord::new(owner)))
    }
}
