//! Data-driven battle content and loaders.
//!
//! This crate houses static content and provides loaders for RON/TOML files:
//! - Card, gear, and banner catalog (RON)
//! - Episode scripts (RON)
//! - Battle tuning (TOML)
//!
//! Content is consumed by runtime oracles and never appears in battle state.
//! A copy of the default data set is compiled in; see [`loaders::BuiltinContent`].
//!
//! All loaders use game-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BuiltinContent, CatalogData, CatalogLoader, ConfigLoader, ContentBundle, ContentFactory,
    EpisodeLoader, LoadResult,
};
