//! Session runtime for episode battles.
//!
//! This crate wires the deterministic rules in `game-core` to live players:
//! one worker task per battle, an injected session registry, player record
//! repositories, and a presentation port. Consumers embed [`BattleRuntime`]
//! to start episodes and route player commands.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`registry`] and [`session`] track live battles
//! - [`rewards`] settles finished battles into the player record
//! - [`workers`] keeps per-session tasks internal to the crate
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod config;
pub mod oracle;
pub mod registry;
pub mod repository;
pub mod rewards;
pub mod runtime;
pub mod session;

mod workers;

pub use api::{
    ChannelPresenter, DefeatReason, LogPresenter, PlayerCommand, PresentationError, Presented,
    Presenter, Rendering, Result, RuntimeError, SessionHandle, TechniqueOption, TurnMenu,
};
pub use config::RuntimeConfig;
pub use oracle::{CatalogOracleImpl, EpisodeOracleImpl, OracleManager};
pub use registry::SessionRegistry;
pub use repository::{
    CardProgress, ChestCounts, DefeatRecord, EpisodeProgress, FilePlayerRepository, GearItem,
    InMemoryPlayerRepository, PlayerRecord, PlayerRepository, RepositoryError,
};
pub use rewards::{RewardResolver, VictorySummary};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder};
pub use session::{Session, SessionId, SessionPhase, SessionView};
