//! Content loaders for reading game data from files.
//!
//! Each loader parses one file into `game-core` types and validates the
//! entries in isolation. [`validate_content`] checks the references between
//! catalogs once everything is loaded.

pub mod config;
pub mod enemies;
pub mod factory;
pub mod fragments;
pub mod themes;
pub mod validate;

pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::{Content, ContentFactory};
pub use fragments::FragmentLoader;
pub use themes::ThemeLoader;
pub use validate::validate_content;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Fails on the first id that appears twice.
pub(crate) fn ensure_unique<I, T>(kind: &str, ids: I) -> LoadResult<()>
where
    I: IntoIterator<Item = T>,
    T: Ord + std::fmt::Display,
{
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if seen.contains(&id) {
            anyhow::bail!("duplicate {kind} id {id}");
        }
        seen.insert(id);
    }
    Ok(())
}
