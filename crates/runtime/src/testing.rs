//! Fixtures built from the shipped data directory.
use std::path::PathBuf;

use game_content::ContentFactory;
use game_core::RunState;

use crate::oracle::OracleManager;

pub(crate) fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

pub(crate) fn oracles() -> OracleManager {
    let content = ContentFactory::new(data_dir()).load_content().unwrap();
    OracleManager::from_content(content)
}

pub(crate) fn new_run(seed: u64) -> RunState {
    RunState::new(seed, oracles().as_game_env()).unwrap()
}
