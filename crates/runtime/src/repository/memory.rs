use std::collections::BTreeMap;
use std::sync::RwLock;

use game_core::{RunState, deserialize_run_state, serialize_run_state};

use super::error::validate_slot;
use super::{RepositoryError, Result, SaveRepository};

/// In-memory implementation of SaveRepository.
///
/// Keeps encoded blobs rather than values so loads go through the same
/// checksum path as the file repository.
#[derive(Default)]
pub struct InMemorySaveRepo {
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemorySaveRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepo {
    fn save(&self, slot: &str, state: &RunState) -> Result<()> {
        validate_slot(slot)?;
        let blob = serialize_run_state(state)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        blobs.insert(slot.to_string(), blob);
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<RunState>> {
        validate_slot(slot)?;
        let blobs = self
            .blobs
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        match blobs.get(slot) {
            Some(blob) => Ok(Some(deserialize_run_state(blob)?)),
            None => Ok(None),
        }
    }

    fn exists(&self, slot: &str) -> bool {
        self.blobs
            .read()
            .map(|blobs| blobs.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        blobs.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(blobs.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn stores_runs_by_slot() {
        let repo = InMemorySaveRepo::new();
        let first = testing::new_run(1);
        let second = testing::new_run(2);

        repo.save("b", &second).unwrap();
        repo.save("a", &first).unwrap();

        assert_eq!(repo.list_slots().unwrap(), vec!["a", "b"]);
        assert_eq!(repo.load("a").unwrap(), Some(first));
        assert_eq!(repo.load("b").unwrap(), Some(second));

        repo.delete("a").unwrap();
        assert!(!repo.exists("a"));
        assert_eq!(repo.load("a").unwrap(), None);
    }

    #[test]
    fn overwrites_existing_slot() {
        let repo = InMemorySaveRepo::new();
        repo.save("main", &testing::new_run(1)).unwrap();
        let replacement = testing::new_run(9);
        repo.save("main", &replacement).unwrap();
        assert_eq!(repo.load("main").unwrap(), Some(replacement));
    }
}
