//! Deterministic battle rules shared by the runtime and content tooling.
//!
//! `game-core` owns the stat pipeline, the combat entities, the turn resolver,
//! the stage cursor over episode scripts, and reward math. Nothing here does
//! I/O or awaits; the runtime drives these APIs from its session workers.
//! All fight mutation flows through [`engine::TurnResolver`].
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod episode;
pub mod error;
pub mod reward;
pub mod state;
pub mod stats;

pub use action::{ActionError, BattleAction, HakiSchool, Technique};
pub use config::{BattleConfig, PerDifficulty, TechniqueCosts};
pub use engine::{TurnEvent, TurnReport, TurnResolver};
pub use env::{
    BannerDefinition, CardDefinition, CardRole, CatalogOracle, EpisodeOracle, GearBoost,
    GearDefinition, HakiProfile, PcgRng, RngOracle, RollContext, SpecialDefinition, TeamBoost,
    compute_seed,
};
pub use episode::{
    DirectorError, Difficulty, EnemyTemplate, EpisodeScript, ReactionSpec, ReactionVerdict, Stage,
    StageDirector, StageKind, StageView, judge_reaction,
};
pub use error::{ErrorSeverity, GameError};
pub use reward::{ChestRank, Grant, Progress, RewardEntry, RewardKind, RewardTable};
pub use state::{
    BattleState, CombatantFlags, CombatantSnapshot, DamageRange, EnemySnapshot, FightOutcome,
    HealItem, Supplies,
};
pub use stats::{BuildError, EquippedGear, TeamMember, TeamSpec, build_team, scale_enemy};
