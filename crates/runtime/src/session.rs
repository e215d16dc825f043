//! Per-battle state owned by exactly one session worker.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use game_core::{BattleState, Difficulty, StageDirector};

use crate::api::{Result, RuntimeError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle guard: a session settles at most once.
///
/// ```text
/// Active ──begin_resolution──▶ Resolving ──terminate──▶ Terminated
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Active,
    Resolving,
    Terminated,
}

impl SessionPhase {
    /// Claims the right to settle the session. Fails once any path has
    /// already claimed it, so a late timer or duplicate command is a no-op.
    pub fn begin_resolution(&mut self) -> Result<()> {
        match self {
            Self::Active => {
                *self = Self::Resolving;
                Ok(())
            }
            Self::Resolving | Self::Terminated => Err(RuntimeError::ConcurrencyGuardTripped),
        }
    }

    pub fn terminate(&mut self) {
        *self = Self::Terminated;
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

pub struct Session {
    pub id: SessionId,
    pub owner: String,
    pub episode: u32,
    pub director: StageDirector,
    pub battle: BattleState,
    pub phase: SessionPhase,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: SessionId,
        owner: impl Into<String>,
        director: StageDirector,
        battle: BattleState,
    ) -> Self {
        Self {
            id,
            owner: owner.into(),
            episode: director.script().number,
            director,
            battle,
            phase: SessionPhase::Active,
            started_at: Utc::now(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.director.difficulty()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            owner: self.owner.clone(),
            episode: self.episode,
            difficulty: self.difficulty(),
            stage_index: self.director.stage_index(),
            stage: self.director.current().map(|s| s.kind.label()),
            phase: self.phase,
            battle: self.battle.clone(),
        }
    }
}

/// Read-only copy of a live session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    pub id: SessionId,
    pub owner: String,
    pub episode: u32,
    pub difficulty: Difficulty,
    pub stage_index: usize,
    /// Label of the active stage; `None` once past the last one.
    pub stage: Option<&'static str>,
    pub phase: SessionPhase,
    pub battle: BattleState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_settles_once() {
        let mut phase = SessionPhase::default();
        assert!(phase.begin_resolution().is_ok());
        assert!(matches!(
            phase.begin_resolution(),
            Err(RuntimeError::ConcurrencyGuardTripped)
        ));
        phase.terminate();
        assert!(phase.is_terminated());
        assert!(phase.begin_resolution().is_err());
    }

    #[test]
    fn ids_round_trip_through_strings() {
        let id = SessionId::new();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
    }
}
