//! Spell fragment catalog loader.

use std::path::Path;

use game_core::SpellFragment;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Fragment catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentCatalog {
    pub fragments: Vec<SpellFragment>,
}

/// Loader for the spell fragment catalog.
pub struct FragmentLoader;

impl FragmentLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SpellFragment>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid fragment catalog {}: {}", path.display(), e))
    }

    /// Parses and validates a fragment catalog.
    pub fn parse(content: &str) -> LoadResult<Vec<SpellFragment>> {
        let catalog: FragmentCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse fragment catalog RON: {}", e))?;

        anyhow::ensure!(!catalog.fragments.is_empty(), "fragment catalog is empty");
        ensure_unique("fragment", catalog.fragments.iter().map(|f| f.id))?;

        Ok(catalog.fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{FragmentId, Matrix, Operation, PatternModifier};

    #[test]
    fn parses_defaults_and_patterns() {
        let fragments = FragmentLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (
                fragments: [
                    (id: 1, matrix: (a: 1, b: 0, c: 0, d: 0), operation: Subtract),
                    (
                        id: 2,
                        matrix: (a: 1, b: 1, c: 1, d: 1),
                        operation: Add,
                        pattern: SelfOnly,
                        cost_weight: 3,
                    ),
                ],
            )
            "#,
        )
        .unwrap();

        assert_eq!(fragments[0].id, FragmentId(1));
        assert_eq!(fragments[0].matrix, Matrix::new(1, 0, 0, 0));
        assert_eq!(fragments[0].pattern, PatternModifier::Derive);
        assert_eq!(fragments[0].cost_weight, 0);
        assert_eq!(fragments[1].operation, Operation::Add);
        assert_eq!(fragments[1].pattern, PatternModifier::SelfOnly);
        assert_eq!(fragments[1].cost_weight, 3);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = FragmentLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (
                fragments: [
                    (id: 4, matrix: (a: 1, b: 0, c: 0, d: 0), operation: Subtract),
                    (id: 4, matrix: (a: 0, b: 1, c: 0, d: 0), operation: Subtract),
                ],
            )
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate fragment id"));
    }
}
