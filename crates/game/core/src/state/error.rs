//! Run state errors.

use crate::battle::BattleError;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::spell::CompositionError;
use crate::state::Position;

/// Errors raised by [`crate::state::RunState`] operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunError {
    #[error("only allowed while exploring")]
    NotExploring,

    #[error("no battle in progress")]
    NotBattling,

    #[error("the run is over")]
    RunOver,

    #[error("player at {position} is not on the stairs")]
    NotOnStairs { position: Position },

    #[error("expected level at depth {expected}, got depth {found}")]
    LevelMismatch { expected: u32, found: u32 },

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for RunError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotExploring | Self::NotBattling | Self::NotOnStairs { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::RunOver | Self::LevelMismatch { .. } => ErrorSeverity::Validation,
            Self::Composition(err) => err.severity(),
            Self::Battle(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotExploring => "RUN_NOT_EXPLORING",
            Self::NotBattling => "RUN_NOT_BATTLING",
            Self::RunOver => "RUN_OVER",
            Self::NotOnStairs { .. } => "RUN_NOT_ON_STAIRS",
            Self::LevelMismatch { .. } => "RUN_LEVEL_MISMATCH",
            Self::Composition(err) => err.error_code(),
            Self::Battle(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}

/// Errors raised while decoding a save blob. Loads are all-or-nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// Bad magic, checksum mismatch, truncated blob or undecodable payload.
    #[error("corrupt save: {0}")]
    CorruptState(String),

    #[error("save version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("failed to encode run state: {0}")]
    Encode(String),
}

impl GameError for SaveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CorruptState(_) | Self::VersionMismatch { .. } => ErrorSeverity::Fatal,
            Self::Encode(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CorruptState(_) => "SAVE_CORRUPT_STATE",
            Self::VersionMismatch { .. } => "SAVE_VERSION_MISMATCH",
            Self::Encode(_) => "SAVE_ENCODE",
        }
    }
}
