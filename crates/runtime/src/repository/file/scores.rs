//! High-score table persisted as pretty-printed JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use game_core::RunSummary;
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, Result};

/// One finished run in the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub run_seed: u64,
    pub max_depth: u32,
    pub enemies_defeated: u32,
    /// Seconds since the Unix epoch.
    pub recorded_at: u64,
}

impl HighScoreEntry {
    pub fn new(summary: RunSummary, recorded_at: u64) -> Self {
        Self {
            run_seed: summary.run_seed,
            max_depth: summary.max_depth,
            enemies_defeated: summary.enemies_defeated,
            recorded_at,
        }
    }

    /// Deeper is better, then more kills, then the older record.
    fn rank_key(&self) -> (std::cmp::Reverse<u32>, std::cmp::Reverse<u32>, u64) {
        (
            std::cmp::Reverse(self.max_depth),
            std::cmp::Reverse(self.enemies_defeated),
            self.recorded_at,
        )
    }
}

/// Bounded, ranked table of run summaries.
pub struct HighScoreStore {
    path: PathBuf,
    capacity: usize,
}

impl HighScoreStore {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_capacity(path, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(path: impl AsRef<Path>, capacity: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity: capacity.max(1),
        }
    }

    /// Records a finished run.
    ///
    /// Returns the 1-based rank the run reached, or `None` if it did not make
    /// the table.
    pub fn record(&self, summary: RunSummary) -> Result<Option<usize>> {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        self.record_entry(HighScoreEntry::new(summary, recorded_at))
    }

    pub fn record_entry(&self, entry: HighScoreEntry) -> Result<Option<usize>> {
        let mut entries = self.load()?;
        let key = entry.rank_key();
        let index = entries.partition_point(|existing| existing.rank_key() <= key);
        if index >= self.capacity {
            return Ok(None);
        }

        entries.insert(index, entry);
        entries.truncate(self.capacity);
        self.store(&entries)?;

        tracing::debug!("Recorded high score at rank {}", index + 1);
        Ok(Some(index + 1))
    }

    /// The best `n` entries, best first.
    pub fn top(&self, n: usize) -> Result<Vec<HighScoreEntry>> {
        let mut entries = self.load()?;
        entries.truncate(n);
        Ok(entries)
    }

    fn load(&self) -> Result<Vec<HighScoreEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path).map_err(RepositoryError::Io)?;
        let mut entries: Vec<HighScoreEntry> =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;
        entries.sort_by_key(HighScoreEntry::rank_key);
        Ok(entries)
    }

    fn store(&self, entries: &[HighScoreEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &self.path).map_err(RepositoryError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(depth: u32, kills: u32, at: u64) -> HighScoreEntry {
        HighScoreEntry {
            run_seed: u64::from(depth) * 100 + u64::from(kills),
            max_depth: depth,
            enemies_defeated: kills,
            recorded_at: at,
        }
    }

    #[test]
    fn empty_table_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("scores.json"));
        assert!(store.top(5).unwrap().is_empty());
    }

    #[test]
    fn ranks_by_depth_then_kills_then_age() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("scores.json"));

        assert_eq!(store.record_entry(entry(2, 5, 10)).unwrap(), Some(1));
        assert_eq!(store.record_entry(entry(4, 1, 11)).unwrap(), Some(1));
        assert_eq!(store.record_entry(entry(2, 7, 12)).unwrap(), Some(2));
        assert_eq!(store.record_entry(entry(2, 5, 13)).unwrap(), Some(4));

        let depths: Vec<(u32, u32, u64)> = store
            .top(10)
            .unwrap()
            .iter()
            .map(|e| (e.max_depth, e.enemies_defeated, e.recorded_at))
            .collect();
        assert_eq!(depths, vec![(4, 1, 11), (2, 7, 12), (2, 5, 10), (2, 5, 13)]);
    }

    #[test]
    fn full_table_drops_weak_runs() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::with_capacity(dir.path().join("scores.json"), 2);

        store.record_entry(entry(5, 0, 1)).unwrap();
        store.record_entry(entry(3, 0, 2)).unwrap();
        assert_eq!(store.record_entry(entry(1, 9, 3)).unwrap(), None);
        assert_eq!(store.record_entry(entry(4, 0, 4)).unwrap(), Some(2));

        let depths: Vec<u32> = store.top(5).unwrap().iter().map(|e| e.max_depth).collect();
        assert_eq!(depths, vec![5, 4]);
    }

    #[test]
    fn record_uses_the_run_summary() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("nested/scores.json"));
        let summary = RunSummary {
            run_seed: 77,
            max_depth: 3,
            enemies_defeated: 4,
        };

        assert_eq!(store.record(summary).unwrap(), Some(1));
        let top = store.top(1).unwrap();
        assert_eq!(top[0].run_seed, 77);
        assert_eq!(top[0].max_depth, 3);
        assert_eq!(top[0].enemies_defeated, 4);
    }

    #[test]
    fn malformed_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            HighScoreStore::new(&path).top(1),
            Err(RepositoryError::Json(_))
        ));
    }
}
