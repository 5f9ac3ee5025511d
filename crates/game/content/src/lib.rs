//! Data-driven content definitions and loaders.
//!
//! This crate reads the static catalogs of the crawler from RON/TOML files:
//! - Spell fragments (`fragments.ron`)
//! - Themes with their weight curves and palettes (`themes.ron`)
//! - Enemy templates (`enemies.ron`)
//! - Game configuration (`config.toml`)
//!
//! Content is consumed by runtime oracles and never appears in run state.
//! Every loader validates what it reads, and [`ContentFactory::load_content`]
//! checks the references between catalogs, so a catalog that loads cleanly
//! never makes level generation fail.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, Content, ContentFactory, EnemyLoader, FragmentLoader, LoadResult, ThemeLoader,
    validate_content,
};
