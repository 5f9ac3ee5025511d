//! Run state: identifiers, the persistent run record and its save blob.
//!
//! [`RunState`] is the single value that must survive a restart. Everything
//! else (catalogs, config) is injected again on load.
mod common;
mod error;
mod run;
#[cfg(feature = "serde")]
mod save;

pub use common::{EntityId, Position};
pub use error::{RunError, SaveError};
pub use run::{Direction, RunPhase, RunState, RunSummary, StepOutcome};
#[cfg(feature = "serde")]
pub use save::{SAVE_MAGIC, SAVE_VERSION, deserialize_run_state, serialize_run_state};
