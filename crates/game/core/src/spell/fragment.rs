//! Collectible spell fragments and the player's fragment inventory.

use std::collections::BTreeMap;
use std::fmt;

use super::error::CompositionError;
use super::pattern::PatternModifier;
use crate::matrix::{Matrix, Operation};

/// Catalog identifier of a [`SpellFragment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragmentId(pub u16);

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fragment:{}", self.0)
    }
}

/// Immutable catalog entry contributing one `(Matrix, Operation, pattern)`
/// triple to a composed spell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellFragment {
    pub id: FragmentId,
    pub matrix: Matrix,
    pub operation: Operation,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pattern: PatternModifier,
    /// Extra cost this fragment adds on top of the formula terms.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost_weight: u32,
}

impl SpellFragment {
    pub fn new(id: FragmentId, matrix: Matrix, operation: Operation) -> Self {
        Self {
            id,
            matrix,
            operation,
            pattern: PatternModifier::Derive,
            cost_weight: 0,
        }
    }

    pub fn with_pattern(mut self, pattern: PatternModifier) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_cost_weight(mut self, cost_weight: u32) -> Self {
        self.cost_weight = cost_weight;
        self
    }

    /// Returns a copy whose matrix is scaled by `percent / 100`.
    pub fn scaled(&self, percent: u32) -> Self {
        Self {
            matrix: self.matrix.scale_percent(percent),
            ..self.clone()
        }
    }
}

/// Fragments owned by the player, keyed by catalog id.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragmentInventory {
    counts: BTreeMap<FragmentId, u32>,
}

impl FragmentInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: FragmentId, count: u32) {
        if count == 0 {
            return;
        }
        let entry = self.counts.entry(id).or_default();
        *entry = entry.saturating_add(count);
    }

    /// Removes `count` copies. Returns false and leaves the inventory
    /// unchanged if fewer are owned.
    pub fn remove(&mut self, id: FragmentId, count: u32) -> bool {
        let owned = self.count(id);
        if owned < count {
            return false;
        }
        if owned == count {
            self.counts.remove(&id);
        } else {
            self.counts.insert(id, owned - count);
        }
        true
    }

    pub fn count(&self, id: FragmentId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FragmentId, u32)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    /// Checks that every id in `ids` is owned at least as many times as it
    /// appears.
    pub fn ensure_owns(&self, ids: &[FragmentId]) -> Result<(), CompositionError> {
        let mut required: BTreeMap<FragmentId, u32> = BTreeMap::new();
        for id in ids {
            *required.entry(*id).or_default() += 1;
        }
        for (fragment, required) in required {
            let owned = self.count(fragment);
            if owned < required {
                return Err(CompositionError::NotOwned {
                    fragment,
                    owned,
                    required,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(FragmentId, u32)> for FragmentInventory {
    fn from_iter<I: IntoIterator<Item = (FragmentId, u32)>>(iter: I) -> Self {
        let mut inventory = Self::new();
        for (id, count) in iter {
            inventory.add(id, count);
        }
        inventory
    }
}
