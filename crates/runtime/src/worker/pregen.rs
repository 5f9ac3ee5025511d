//! Background generation of the next dungeon level.
//!
//! Generation is pure and CPU-bound, so it runs on the blocking pool from a
//! clone of the oracles. The result is only adopted if it is exactly the
//! level the run descends into; anything else is discarded.
use game_core::{DungeonLevel, OracleError, generate_level};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::api::{Result, RuntimeError};
use crate::oracle::OracleManager;

pub(crate) struct LevelPregen {
    depth: u32,
    handle: JoinHandle<std::result::Result<DungeonLevel, OracleError>>,
}

impl LevelPregen {
    /// Starts generating `depth` of the run. Returns `None` outside a Tokio
    /// runtime.
    pub(crate) fn spawn(oracles: OracleManager, run_seed: u64, depth: u32) -> Option<Self> {
        let runtime = Handle::try_current().ok()?;
        let handle = runtime.spawn_blocking(move || {
            let level = generate_level(run_seed, depth, oracles.as_game_env());
            tracing::debug!(depth, "pre-generated level");
            level
        });
        Some(Self { depth, handle })
    }

    pub(crate) fn depth(&self) -> u32 {
        self.depth
    }

    /// Waits for the level.
    pub(crate) async fn join(self) -> Result<DungeonLevel> {
        let level = self.handle.await.map_err(RuntimeError::WorkerJoin)??;
        Ok(level)
    }

    /// A worker that was cancelled before producing anything.
    #[cfg(test)]
    pub(crate) fn cancelled(depth: u32) -> Self {
        let handle = tokio::spawn(std::future::pending());
        handle.abort();
        Self { depth, handle }
    }

    /// Discards the level. A generation already running finishes on the
    /// blocking pool and its result is dropped.
    pub(crate) fn abort(self) {
        self.handle.abort();
    }
}
