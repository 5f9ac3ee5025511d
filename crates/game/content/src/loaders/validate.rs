//! Cross-catalog reference checks.

use std::collections::BTreeSet;

use game_core::{EnemyTemplate, FragmentId, GameConfig, SpellFragment, ThemeDescriptor};

use crate::loaders::LoadResult;

/// Checks every reference between the loaded catalogs.
///
/// - theme pools name existing enemy templates
/// - recipes name existing fragments, and their logic only uses listed ones
/// - starting fragments exist
pub fn validate_content(
    config: &GameConfig,
    fragments: &[SpellFragment],
    themes: &[ThemeDescriptor],
    enemies: &[EnemyTemplate],
) -> LoadResult<()> {
    let fragment_ids: BTreeSet<FragmentId> = fragments.iter().map(|f| f.id).collect();

    for theme in themes {
        for template in &theme.enemy_pool {
            anyhow::ensure!(
                enemies.iter().any(|e| e.id == *template),
                "theme '{}' references unknown {}",
                theme.name,
                template
            );
        }
    }

    for enemy in enemies {
        for (index, recipe) in enemy.spells.iter().enumerate() {
            if let Some(missing) = recipe.fragments.iter().find(|id| !fragment_ids.contains(*id)) {
                anyhow::bail!(
                    "enemy '{}' recipe {} references unknown {}",
                    enemy.name,
                    index,
                    missing
                );
            }
            let listed: BTreeSet<FragmentId> = recipe.fragments.iter().copied().collect();
            if let Some(stray) = recipe.logic().leaves().into_iter().find(|id| !listed.contains(id)) {
                anyhow::bail!(
                    "enemy '{}' recipe {} logic uses {} which the recipe does not list",
                    enemy.name,
                    index,
                    stray
                );
            }
        }
    }

    for (id, _) in &config.player.starting_fragments {
        anyhow::ensure!(
            fragment_ids.contains(id),
            "player starting inventory references unknown {}",
            id
        );
    }

    Ok(())
}
