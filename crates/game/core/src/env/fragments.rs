use crate::spell::{FragmentId, SpellFragment};

/// Read-only fragment catalog, loaded once at startup.
pub trait FragmentOracle: Send + Sync {
    fn fragment(&self, id: FragmentId) -> Option<&SpellFragment>;

    /// Every catalog id in ascending order.
    fn fragment_ids(&self) -> Vec<FragmentId>;

    /// Resolves `ids` in order, skipping unknown ones.
    fn resolve(&self, ids: &[FragmentId]) -> Vec<SpellFragment> {
        ids.iter()
            .filter_map(|id| self.fragment(*id).cloned())
            .collect()
    }
}
