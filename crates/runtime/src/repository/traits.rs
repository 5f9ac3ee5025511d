//! Repository contracts for saving and loading runs.

use game_core::RunState;

use super::Result;

/// Repository for run persistence.
///
/// Implementations store the self-checking blob produced by
/// [`game_core::serialize_run_state`], so a load either restores the exact
/// run or fails.
pub trait SaveRepository: Send + Sync {
    /// Save a run under `slot`, replacing any previous save.
    fn save(&self, slot: &str, state: &RunState) -> Result<()>;

    /// Load the run saved under `slot`.
    fn load(&self, slot: &str) -> Result<Option<RunState>>;

    /// Check if a save exists
    fn exists(&self, slot: &str) -> bool;

    /// Delete a save
    fn delete(&self, slot: &str) -> Result<()>;

    /// List all slot names in ascending order
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
