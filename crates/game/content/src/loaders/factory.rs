//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};

use game_core::{CatalogSnapshot, EnemyTemplate, GameConfig, SpellFragment, ThemeDescriptor};

use crate::loaders::{
    ConfigLoader, EnemyLoader, FragmentLoader, LoadResult, ThemeLoader, validate_content,
};

/// Everything the runtime needs from the data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Content {
    pub config: GameConfig,
    pub catalog: CatalogSnapshot,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── fragments.ron
/// ├── themes.ron
/// └── enemies.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the fragment catalog from `fragments.ron`.
    pub fn load_fragments(&self) -> LoadResult<Vec<SpellFragment>> {
        FragmentLoader::load(&self.data_dir.join("fragments.ron"))
    }

    /// Load the theme catalog from `themes.ron`.
    pub fn load_themes(&self) -> LoadResult<Vec<ThemeDescriptor>> {
        ThemeLoader::load(&self.data_dir.join("themes.ron"))
    }

    /// Load enemy templates from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyTemplate>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Loads every file and checks the references between them.
    pub fn load_content(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let fragments = self.load_fragments()?;
        let themes = self.load_themes()?;
        let enemies = self.load_enemies()?;
        validate_content(&config, &fragments, &themes, &enemies)?;

        Ok(Content {
            config,
            catalog: CatalogSnapshot::new(fragments, themes, enemies),
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_fragments().unwrap_err();
        assert!(err.to_string().contains("fragments.ron"));
    }
}
