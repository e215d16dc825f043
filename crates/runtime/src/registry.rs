//! Session registry: every live battle, by session id and by owner.
//!
//! Purely in-memory; a process restart drops active battles. The registry is
//! injected into the runtime rather than living in a global.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::session::SessionId;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
    /// owner -> session; at most one live battle per owner.
    owners: DashMap<String, SessionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the owner's battle slot and allocates a session id.
    ///
    /// Fails with [`RuntimeError::BattleInProgress`] if the owner already has
    /// a claimed slot, even one whose worker has not been attached yet.
    pub fn create(&self, owner: &str) -> Result<SessionId> {
        match self.owners.entry(owner.to_string()) {
            Entry::Occupied(_) => Err(RuntimeError::BattleInProgress),
            Entry::Vacant(slot) => {
                let id = SessionId::new();
                slot.insert(id);
                tracing::debug!(session = %id, owner, "Session slot claimed");
                Ok(id)
            }
        }
    }

    /// Publishes the worker handle for a slot claimed with [`Self::create`].
    pub fn attach(&self, handle: SessionHandle) {
        self.sessions.insert(handle.id(), handle);
    }

    /// Gives back a claimed slot whose worker never started.
    pub fn release(&self, owner: &str, id: SessionId) {
        self.owners.remove_if(owner, |_, claimed| *claimed == id);
    }

    pub fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Removes a session and cancels its worker. Idempotent.
    pub fn delete(&self, id: SessionId) -> Option<SessionHandle> {
        let (_, handle) = self.sessions.remove(&id)?;
        self.release(handle.owner(), id);
        handle.cancel();
        tracing::debug!(session = %id, owner = handle.owner(), "Session removed");
        Some(handle)
    }

    pub fn for_owner(&self, owner: &str) -> Option<SessionId> {
        self.owners.get(owner).map(|entry| *entry.value())
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
