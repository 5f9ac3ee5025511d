//! Runtime wrappers around static game content oracles.
//!
//! These implementations expose `game-core` oracle traits and bundle them into
//! an [`OracleManager`] so the runtime can build [`game_core::Env`] snapshots
//! on demand. The data is immutable at runtime; dynamic state lives in
//! [`game_core::RunState`] and the repositories.
mod fragments;
mod themes;

use std::sync::Arc;

use game_content::Content;
use game_core::{Env, GameConfig, GameEnv, PcgRng};

pub use fragments::FragmentOracleImpl;
pub use themes::ThemeOracleImpl;

/// Manages all oracle implementations and provides unified access.
///
/// Cloning is cheap; background workers take their own clone.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) fragments: Arc<FragmentOracleImpl>,
    pub(crate) themes: Arc<ThemeOracleImpl>,
    pub(crate) config: Arc<GameConfig>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(
        fragments: Arc<FragmentOracleImpl>,
        themes: Arc<ThemeOracleImpl>,
        config: Arc<GameConfig>,
    ) -> Self {
        Self {
            fragments,
            themes,
            config,
            rng: PcgRng, // PcgRng is stateless
        }
    }

    /// Builds the oracles from loaded content.
    pub fn from_content(content: Content) -> Self {
        let Content { config, catalog } = content;
        Self::new(
            Arc::new(FragmentOracleImpl::new(catalog.fragments)),
            Arc::new(ThemeOracleImpl::new(catalog.themes, catalog.enemies)),
            Arc::new(config),
        )
    }

    /// Converts oracle manager into GameEnv for game-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::with_all(
            self.fragments.as_ref(),
            self.themes.as_ref(),
            &self.rng,
            self.config.as_ref(),
        )
        .into_game_env()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn fragments(&self) -> &FragmentOracleImpl {
        &self.fragments
    }

    pub fn themes(&self) -> &ThemeOracleImpl {
        &self.themes
    }
}
