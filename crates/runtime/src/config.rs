//! Runtime configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Settings that shape a session but not the simulation itself.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Fixed run seed; a fresh one is drawn per run when unset.
    pub run_seed: Option<u64>,
    /// Directory holding `config.toml`, `fragments.ron`, `themes.ron` and
    /// `enemies.ron`.
    pub data_dir: PathBuf,
    /// Directory for save blobs and the high-score table.
    pub save_dir: PathBuf,
    /// Generate the next level in the background while the player explores.
    pub pregenerate: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            run_seed: None,
            data_dir: PathBuf::from("data"),
            save_dir: default_save_dir(),
            pregenerate: true,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CRAWL_SEED` - Fixed run seed (default: random per run)
    /// - `CRAWL_DATA_DIR` - Content directory (default: `data`)
    /// - `CRAWL_SAVE_DIR` - Save directory (default: platform-specific)
    /// - `CRAWL_PREGENERATE` - Background level generation (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.run_seed = read_env::<u64>("CRAWL_SEED");

        if let Ok(dir) = env::var("CRAWL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("CRAWL_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Some(enable) = read_env::<bool>("CRAWL_PREGENERATE") {
            config.pregenerate = enable;
        }

        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.run_seed = Some(seed);
        self
    }

    /// Path of the save blob for `slot`.
    pub fn save_path(&self, slot: &str) -> PathBuf {
        self.save_dir.join(format!("{slot}.sav"))
    }

    pub fn scores_path(&self) -> PathBuf {
        self.save_dir.join("scores.json")
    }
}

fn default_save_dir() -> PathBuf {
    ProjectDirs::from("", "", "matrix-crawl")
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from("./saves"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_the_save_dir() {
        let config = RuntimeConfig {
            save_dir: PathBuf::from("/tmp/crawl"),
            ..RuntimeConfig::default()
        }
        .with_seed(9);

        assert_eq!(config.run_seed, Some(9));
        assert_eq!(config.save_path("slot1"), PathBuf::from("/tmp/crawl/slot1.sav"));
        assert_eq!(config.scores_path(), PathBuf::from("/tmp/crawl/scores.json"));
    }

    #[test]
    fn defaults_enable_pregeneration() {
        let config = RuntimeConfig::default();
        assert!(config.pregenerate);
        assert_eq!(config.run_seed, None);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }
}
