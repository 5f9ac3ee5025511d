//! [`game_core::FragmentOracle`] backed by an in-memory map.
use std::collections::BTreeMap;

use game_core::{FragmentId, FragmentOracle, SpellFragment};

/// FragmentOracle implementation with static fragment definitions
#[derive(Debug, Default)]
pub struct FragmentOracleImpl {
    fragments: BTreeMap<FragmentId, SpellFragment>,
}

impl FragmentOracleImpl {
    pub fn new(fragments: impl IntoIterator<Item = SpellFragment>) -> Self {
        Self {
            fragments: fragments
                .into_iter()
                .map(|fragment| (fragment.id, fragment))
                .collect(),
        }
    }

    /// Add a fragment definition, replacing any with the same id.
    pub fn add_fragment(&mut self, fragment: SpellFragment) {
        self.fragments.insert(fragment.id, fragment);
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl FragmentOracle for FragmentOracleImpl {
    fn fragment(&self, id: FragmentId) -> Option<&SpellFragment> {
        self.fragments.get(&id)
    }

    fn fragment_ids(&self) -> Vec<FragmentId> {
        self.fragments.keys().copied().collect()
    }
}
