//! Enemy template catalog loader.

use std::path::Path;

use game_core::EnemyTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyTemplate>,
}

/// Loader for enemy templates.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid enemy catalog {}: {}", path.display(), e))
    }

    /// Parses and validates an enemy catalog.
    ///
    /// Health shapes must be non-negative with a positive sum, and every
    /// template needs at least one recipe with at least one fragment.
    pub fn parse(content: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let catalog: EnemyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        ensure_unique("enemy", catalog.enemies.iter().map(|e| e.id))?;

        for enemy in &catalog.enemies {
            let cells = enemy.health_shape.cells();
            anyhow::ensure!(
                cells.iter().all(|cell| *cell >= 0) && cells.iter().any(|cell| *cell > 0),
                "enemy '{}': health_shape must be non-negative with a positive sum",
                enemy.name
            );
            anyhow::ensure!(
                !enemy.spells.is_empty(),
                "enemy '{}': needs at least one spell recipe",
                enemy.name
            );
            if let Some(index) = enemy.spells.iter().position(|r| r.fragments.is_empty()) {
                anyhow::bail!("enemy '{}': recipe {} has no fragments", enemy.name, index);
            }
        }

        Ok(catalog.enemies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ConditionalNode, FragmentId, Matrix};

    #[test]
    fn parses_recipes_with_logic() {
        let enemies = EnemyLoader::parse(
            r#"
            #![enable(unwrap_newtypes, implicit_some)]
            (
                enemies: [
                    (
                        id: 0,
                        name: "wisp",
                        health_shape: (a: 1, b: 0, c: 0, d: 1),
                        gauge_max: 10,
                        gauge_regen: 2,
                        spells: [
                            (fragments: [1]),
                            (
                                fragments: [1, 2],
                                logic: If(
                                    predicate: HealthBelow(side: Caster, magnitude: 5),
                                    then: Leaf(2),
                                    otherwise: Leaf(1),
                                ),
                            ),
                        ],
                        appearance: 44,
                    ),
                ],
            )
            "#,
        )
        .unwrap();

        let wisp = &enemies[0];
        assert_eq!(wisp.health_shape, Matrix::new(1, 0, 0, 1));
        assert_eq!(wisp.spells[0].logic, None);
        assert!(matches!(wisp.spells[1].logic, Some(ConditionalNode::If { .. })));
        assert_eq!(wisp.spells[1].fragments, vec![FragmentId(1), FragmentId(2)]);
        assert!(wisp.appearance.is_some());
    }

    #[test]
    fn zero_shape_is_rejected() {
        let err = EnemyLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (
                enemies: [
                    (
                        id: 0,
                        name: "ghost",
                        health_shape: (a: 0, b: 0, c: 0, d: 0),
                        gauge_max: 10,
                        gauge_regen: 2,
                        spells: [(fragments: [1])],
                    ),
                ],
            )
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
