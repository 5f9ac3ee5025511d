//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing sections and fields fall back to [`GameConfig::default`].
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let limits = &config.limits;
        anyhow::ensure!(
            limits.max_nodes > 0 && limits.max_depth > 0,
            "composition limits must be positive"
        );
        let health = &config.health;
        anyhow::ensure!(
            health.cell_floor == 0,
            "health cell_floor must be 0 so the zero matrix stays reachable, got {}",
            health.cell_floor
        );
        anyhow::ensure!(
            health.cell_floor <= health.cell_ceiling,
            "health cell_floor {} exceeds cell_ceiling {}",
            health.cell_floor,
            health.cell_ceiling
        );
        let dungeon = &config.dungeon;
        anyhow::ensure!(
            dungeon.room_min_size > 0 && dungeon.room_min_size <= dungeon.room_max_size,
            "room sizes must satisfy 0 < room_min_size <= room_max_size"
        );
        anyhow::ensure!(
            dungeon.base_width >= 3 && dungeon.base_height >= 3,
            "dungeon must be at least 3x3"
        );
        anyhow::ensure!(
            dungeon.max_width >= dungeon.base_width && dungeon.max_height >= dungeon.base_height,
            "dungeon max size {}x{} is below base size {}x{}",
            dungeon.max_width,
            dungeon.max_height,
            dungeon.base_width,
            dungeon.base_height
        );

        Ok(config)
    }
}
