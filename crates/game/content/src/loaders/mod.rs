//! Content loaders for reading battle data from files.
//!
//! Catalog and episode scripts are RON, tuning is TOML. Every loader has a
//! `load(path)` entry point and a `parse(text)` one so the built-in set can
//! reuse the same validation.

pub mod builtin;
pub mod catalog;
pub mod config;
pub mod episodes;
pub mod factory;

pub use builtin::BuiltinContent;
pub use catalog::{CatalogData, CatalogLoader};
pub use config::ConfigLoader;
pub use episodes::{EpisodeBookData, EpisodeLoader};
pub use factory::{ContentBundle, ContentFactory};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
