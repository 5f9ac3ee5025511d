//! Serializable catalog snapshot.
//!
//! A plain-data copy of every catalog that implements both oracle traits.
//! Handy for fixtures, offline tools and shipping catalogs alongside a save.

use super::{EnemyTemplate, EnemyTemplateId, FragmentOracle, ThemeDescriptor, ThemeOracle};
use crate::spell::{FragmentId, SpellFragment};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogSnapshot {
    pub fragments: Vec<SpellFragment>,
    pub themes: Vec<ThemeDescriptor>,
    pub enemies: Vec<EnemyTemplate>,
}

impl CatalogSnapshot {
    /// Builds a snapshot, sorting every list by id.
    pub fn new(
        mut fragments: Vec<SpellFragment>,
        mut themes: Vec<ThemeDescriptor>,
        mut enemies: Vec<EnemyTemplate>,
    ) -> Self {
        fragments.sort_by_key(|fragment| fragment.id);
        themes.sort_by_key(|theme| theme.id);
        enemies.sort_by_key(|enemy| enemy.id);
        Self {
            fragments,
            themes,
            enemies,
        }
    }

    /// Copies the catalogs behind a pair of oracles.
    pub fn from_oracles<F, T>(fragments: &F, themes: &T) -> Self
    where
        F: FragmentOracle + ?Sized,
        T: ThemeOracle + ?Sized,
    {
        let themes_list = themes.themes().to_vec();
        let mut enemy_ids: Vec<EnemyTemplateId> = themes_list
            .iter()
            .flat_map(|theme| theme.enemy_pool.iter().copied())
            .collect();
        enemy_ids.sort();
        enemy_ids.dedup();

        Self::new(
            fragments.resolve(&fragments.fragment_ids()),
            themes_list,
            enemy_ids
                .into_iter()
                .filter_map(|id| themes.enemy_template(id).cloned())
                .collect(),
        )
    }
}

impl FragmentOracle for CatalogSnapshot {
    fn fragment(&self, id: FragmentId) -> Option<&SpellFragment> {
        self.fragments.iter().find(|fragment| fragment.id == id)
    }

    fn fragment_ids(&self) -> Vec<FragmentId> {
        self.fragments.iter().map(|fragment| fragment.id).collect()
    }
}

impl ThemeOracle for CatalogSnapshot {
    fn themes(&self) -> &[ThemeDescriptor] {
        &self.themes
    }

    fn enemy_template(&self, id: EnemyTemplateId) -> Option<&EnemyTemplate> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }
}
