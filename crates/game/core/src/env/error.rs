//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::spell::FragmentId;

use super::EnemyTemplateId;

/// Errors raised when the environment lacks data a core operation needs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("FragmentOracle not available")]
    FragmentsNotAvailable,

    #[error("ThemeOracle not available")]
    ThemesNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("theme catalog has no themes")]
    NoThemes,

    #[error("fragment {0} not found")]
    FragmentNotFound(FragmentId),

    #[error("enemy template {0} not found")]
    EnemyTemplateNotFound(EnemyTemplateId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // Missing oracles are fatal - nothing can proceed
            FragmentsNotAvailable | ThemesNotAvailable | RngNotAvailable => ErrorSeverity::Fatal,

            NoThemes | FragmentNotFound(_) | EnemyTemplateNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            FragmentsNotAvailable => "ORACLE_FRAGMENTS_NOT_AVAILABLE",
            ThemesNotAvailable => "ORACLE_THEMES_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            NoThemes => "ORACLE_NO_THEMES",
            FragmentNotFound(_) => "ORACLE_FRAGMENT_NOT_FOUND",
            EnemyTemplateNotFound(_) => "ORACLE_ENEMY_TEMPLATE_NOT_FOUND",
        }
    }
}
