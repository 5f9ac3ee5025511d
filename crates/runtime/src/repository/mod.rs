//! Repository layer for dynamic runtime data
//!
//! Repositories handle data that CHANGES during play:
//! - Run saves (self-checking blobs)
//! - The high-score table
//!
//! Static game content (fragments, themes, enemies) is handled by Oracles,
//! not Repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileSaveRepository, HighScoreEntry, HighScoreStore};
pub use memory::InMemorySaveRepo;
pub use traits::SaveRepository;
