//! Public API surface for runtime consumers.
//!
//! Exposes the error type shared by the crate and the provider abstraction
//! clients use to feed player input into a [`crate::Session`].
mod errors;
mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{AutopilotProvider, PlayerInput, PlayerProvider, ScriptedProvider};
