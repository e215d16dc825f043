//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or persistence.

pub mod commands;
pub mod errors;
pub mod handle;
pub mod presenter;

pub use commands::{DefeatReason, PlayerCommand};
pub use errors::{Result, RuntimeError};
pub use handle::SessionHandle;
pub use presenter::{
    ChannelPresenter, LogPresenter, PresentationError, Presented, Presenter, Rendering,
    TechniqueOption, TurnMenu,
};
