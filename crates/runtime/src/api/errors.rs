//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the run state, workers and repositories so clients
//! can bubble them up with consistent context.
use game_core::{GameError, OracleError, RunError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("level pre-generation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("input limit of {limit} reached before the run ended")]
    InputLimit { limit: usize },
}

impl RuntimeError {
    /// True when the session can keep going after this error.
    ///
    /// Rejected player inputs are recoverable; broken catalogs and I/O are
    /// not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RuntimeError::Run(err) => !err.severity().is_internal(),
            RuntimeError::Oracle(_)
            | RuntimeError::Repository(_)
            | RuntimeError::WorkerJoin(_)
            | RuntimeError::InputLimit { .. } => false,
        }
    }
}
