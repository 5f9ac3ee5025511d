//! Runtime orchestration for the deterministic crawler core.
//!
//! This crate wires oracle access, repositories, player providers and the
//! level pre-generation worker into a [`Session`] that drives one run.
//! `game-core` stays pure; everything that touches files, threads or logs
//! lives here.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the run driver
//! - [`api`] exposes the error type and the provider abstraction
//! - [`config`] reads runtime settings from the environment
//! - [`oracle`] and [`repository`] provide data adapters reused by clients
pub mod api;
pub mod config;
pub mod oracle;
pub mod repository;
pub mod session;

mod worker;

#[cfg(test)]
mod testing;

pub use api::{
    AutopilotProvider, PlayerInput, PlayerProvider, Result, RuntimeError, ScriptedProvider,
};
pub use config::RuntimeConfig;
pub use oracle::{FragmentOracleImpl, OracleManager, ThemeOracleImpl};
pub use repository::{
    FileSaveRepository, HighScoreEntry, HighScoreStore, InMemorySaveRepo, RepositoryError,
    SaveRepository,
};
pub use session::{InputOutcome, Session};
