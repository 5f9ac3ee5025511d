//! Theme catalog loader.

use std::path::Path;

use game_core::ThemeDescriptor;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Theme catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeCatalog {
    pub themes: Vec<ThemeDescriptor>,
}

/// Loader for themes, their weight curves and palettes.
pub struct ThemeLoader;

impl ThemeLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ThemeDescriptor>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid theme catalog {}: {}", path.display(), e))
    }

    /// Parses and validates a theme catalog.
    ///
    /// Every curve must start at depth 0 with strictly increasing depths,
    /// and at least one theme must carry weight at depth 0.
    pub fn parse(content: &str) -> LoadResult<Vec<ThemeDescriptor>> {
        let catalog: ThemeCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse theme catalog RON: {}", e))?;

        anyhow::ensure!(!catalog.themes.is_empty(), "theme catalog is empty");
        ensure_unique("theme", catalog.themes.iter().map(|t| t.id))?;

        for theme in &catalog.themes {
            theme
                .curve
                .validate()
                .map_err(|e| anyhow::anyhow!("theme '{}': {}", theme.name, e))?;
            anyhow::ensure!(
                theme.difficulty_percent > 0,
                "theme '{}': difficulty_percent must be positive",
                theme.name
            );
        }
        anyhow::ensure!(
            catalog.themes.iter().any(|t| t.curve.weight_at(0) > 0),
            "no theme has weight at depth 0"
        );

        Ok(catalog.themes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{AppearanceTag, ThemeId};

    const PALETTE: &str =
        "(floor: 1, wall: 2, door: 3, item: 4, spawn: 5, stairs: 6, enemy: 7)";

    fn catalog(curve: &str) -> String {
        format!(
            r#"
            #![enable(unwrap_newtypes)]
            (
                themes: [
                    (
                        id: 3,
                        name: "crypt",
                        curve: (keys: {curve}),
                        difficulty_percent: 100,
                        enemy_pool: [0],
                        palette: {PALETTE},
                    ),
                ],
            )
            "#
        )
    }

    #[test]
    fn parses_theme() {
        let themes = ThemeLoader::parse(&catalog("[(0, 10), (5, 40)]")).unwrap();
        assert_eq!(themes[0].id, ThemeId(3));
        assert_eq!(themes[0].curve.weight_at(5), 40);
        assert_eq!(themes[0].palette.enemy, AppearanceTag(7));
    }

    #[test]
    fn malformed_curves_are_rejected() {
        let err = ThemeLoader::parse(&catalog("[(2, 10)]")).unwrap_err();
        assert!(err.to_string().contains("crypt"));
        assert!(ThemeLoader::parse(&catalog("[(0, 10), (4, 5), (4, 6)]")).is_err());
        assert!(ThemeLoader::parse(&catalog("[]")).is_err());
    }

    #[test]
    fn depth_zero_needs_a_theme() {
        let err = ThemeLoader::parse(&catalog("[(0, 0), (3, 50)]")).unwrap_err();
        assert!(err.to_string().contains("depth 0"));
    }
}
