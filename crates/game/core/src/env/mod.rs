//! Traits describing read-only catalog data.
//!
//! Oracles expose fragment definitions, themes, enemy templates and the
//! stateless RNG. The [`Env`] aggregate bundles them with the tuning
//! [`GameConfig`] so battles and the generator reach everything they need
//! without hard coupling to concrete implementations or global state.
mod error;
mod fragments;
mod rng;
mod snapshot;
mod themes;

pub use error::OracleError;
pub use fragments::FragmentOracle;
pub use rng::{PcgRng, RngOracle, roll_seed};
pub use snapshot::CatalogSnapshot;
pub use themes::{
    AppearanceTag, EnemyTemplate, EnemyTemplateId, SpellRecipe, ThemeDescriptor, ThemeId,
    ThemeOracle, ThemePalette, WeightCurve, WeightCurveError,
};

use crate::config::GameConfig;

/// Aggregates read-only oracles required by the battle resolver and generator.
pub struct Env<'a, F, T, R>
where
    F: FragmentOracle + ?Sized,
    T: ThemeOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fragments: Option<&'a F>,
    themes: Option<&'a T>,
    rng: Option<&'a R>,
    config: &'a GameConfig,
}

impl<F, T, R> Clone for Env<'_, F, T, R>
where
    F: FragmentOracle + ?Sized,
    T: ThemeOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, T, R> Copy for Env<'_, F, T, R>
where
    F: FragmentOracle + ?Sized,
    T: ThemeOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<'a, dyn FragmentOracle + 'a, dyn ThemeOracle + 'a, dyn RngOracle + 'a>;

impl<'a, F, T, R> Env<'a, F, T, R>
where
    F: FragmentOracle + ?Sized,
    T: ThemeOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        fragments: Option<&'a F>,
        themes: Option<&'a T>,
        rng: Option<&'a R>,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            fragments,
            themes,
            rng,
            config,
        }
    }

    pub fn with_all(fragments: &'a F, themes: &'a T, rng: &'a R, config: &'a GameConfig) -> Self {
        Self::new(Some(fragments), Some(themes), Some(rng), config)
    }

    /// Returns the FragmentOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::FragmentsNotAvailable` if no fragment oracle was provided.
    pub fn fragments(&self) -> Result<&'a F, OracleError> {
        self.fragments.ok_or(OracleError::FragmentsNotAvailable)
    }

    /// Returns the ThemeOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ThemesNotAvailable` if no theme oracle was provided.
    pub fn themes(&self) -> Result<&'a T, OracleError> {
        self.themes.ok_or(OracleError::ThemesNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }
}

impl<'a, F, T, R> Env<'a, F, T, R>
where
    F: FragmentOracle + 'a,
    T: ThemeOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv` (consumes self).
    pub fn into_game_env(self) -> GameEnv<'a> {
        self.as_game_env()
    }

    /// Converts this environment into a trait-object based `GameEnv` (borrows self).
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let fragments: Option<&'a dyn FragmentOracle> = self.fragments.map(|f| f as _);
        let themes: Option<&'a dyn ThemeOracle> = self.themes.map(|t| t as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|r| r as _);
        Env::new(fragments, themes, rng, self.config)
    }
}
