//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from session workers, the player store, content, and the
//! core rules so callers can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ActionError, BuildError, DirectorError, ErrorSeverity, GameError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("team could not be assembled: {0}")]
    Configuration(#[from] BuildError),

    #[error("episode {0} does not exist")]
    UnknownEpisode(u32),

    #[error("episode {requested} is locked; highest unlocked is {unlocked}")]
    EpisodeLocked { requested: u32, unlocked: u32 },

    #[error("battle already in progress")]
    BattleInProgress,

    #[error("recovering from defeat; try again in {remaining_secs}s")]
    CooldownActive { remaining_secs: u64 },

    #[error("session not found")]
    SessionNotFound,

    #[error("session belongs to another player")]
    NotSessionOwner,

    #[error("session already finished")]
    ConcurrencyGuardTripped,

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Director(#[from] DirectorError),

    #[error("command does not apply to the current screen")]
    UnexpectedCommand,

    #[error(transparent)]
    Store(#[from] RepositoryError),

    #[error("content error: {0}")]
    Content(String),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Action(e) => e.severity(),
            Self::Director(e) => e.severity(),
            Self::Configuration(e) => e.severity(),
            Self::UnknownEpisode(_)
            | Self::EpisodeLocked { .. }
            | Self::BattleInProgress
            | Self::CooldownActive { .. }
            | Self::SessionNotFound
            | Self::NotSessionOwner
            | Self::UnexpectedCommand => ErrorSeverity::Validation,
            Self::ConcurrencyGuardTripped => ErrorSeverity::Recoverable,
            Self::Store(_) | Self::CommandChannelClosed | Self::ReplyChannelClosed(_) => {
                ErrorSeverity::Recoverable
            }
            Self::WorkerJoin(_) => ErrorSeverity::Internal,
            Self::Content(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "RUNTIME_CONFIGURATION",
            Self::UnknownEpisode(_) => "RUNTIME_UNKNOWN_EPISODE",
            Self::EpisodeLocked { .. } => "RUNTIME_EPISODE_LOCKED",
            Self::BattleInProgress => "RUNTIME_BATTLE_IN_PROGRESS",
            Self::CooldownActive { .. } => "RUNTIME_COOLDOWN_ACTIVE",
            Self::SessionNotFound => "RUNTIME_SESSION_NOT_FOUND",
            Self::NotSessionOwner => "RUNTIME_NOT_SESSION_OWNER",
            Self::ConcurrencyGuardTripped => "RUNTIME_GUARD_TRIPPED",
            Self::Action(e) => e.error_code(),
            Self::Director(e) => e.error_code(),
            Self::UnexpectedCommand => "RUNTIME_UNEXPECTED_COMMAND",
            Self::Store(_) => "RUNTIME_STORE",
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}
