//! [`game_core::ThemeOracle`] holding themes and enemy templates.
use std::collections::BTreeMap;

use game_core::{EnemyTemplate, EnemyTemplateId, ThemeDescriptor, ThemeOracle};

/// ThemeOracle implementation with static theme and enemy data
#[derive(Debug, Default)]
pub struct ThemeOracleImpl {
    themes: Vec<ThemeDescriptor>,
    enemies: BTreeMap<EnemyTemplateId, EnemyTemplate>,
}

impl ThemeOracleImpl {
    pub fn new(
        themes: impl IntoIterator<Item = ThemeDescriptor>,
        enemies: impl IntoIterator<Item = EnemyTemplate>,
    ) -> Self {
        let mut themes: Vec<ThemeDescriptor> = themes.into_iter().collect();
        themes.sort_by_key(|theme| theme.id);
        Self {
            themes,
            enemies: enemies
                .into_iter()
                .map(|enemy| (enemy.id, enemy))
                .collect(),
        }
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }
}

impl ThemeOracle for ThemeOracleImpl {
    fn themes(&self) -> &[ThemeDescriptor] {
        &self.themes
    }

    fn enemy_template(&self, id: EnemyTemplateId) -> Option<&EnemyTemplate> {
        self.enemies.get(&id)
    }
}
