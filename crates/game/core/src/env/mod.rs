//! Traits describing read-only battle content.
//!
//! Oracles expose card and gear definitions, episode scripts, and dice without
//! coupling the rules to a concrete content source.
mod catalog;
mod episodes;
mod rng;

pub use catalog::{
    BannerDefinition, CardDefinition, CardRole, CatalogOracle, GearBoost, GearDefinition,
    HakiProfile, SpecialDefinition, TeamBoost,
};
pub use episodes::EpisodeOracle;
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};
