//! File-backed repositories.
//!
//! Every write goes to a sibling `.tmp` file first and is renamed into
//! place, so a crash never leaves a half-written save or score table.
mod save;
mod scores;

pub use save::FileSaveRepository;
pub use scores::{HighScoreEntry, HighScoreStore};
