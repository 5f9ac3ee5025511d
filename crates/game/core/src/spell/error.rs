//! Spell composition errors.

use super::fragment::FragmentId;
use crate::error::{ErrorSeverity, GameError};

/// Reasons a fragment list plus logic tree cannot become a spell.
///
/// Composition never mutates anything, so every variant is safe to surface
/// to the player and retry with different input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompositionError {
    /// A leaf references a fragment that was not supplied.
    #[error("logic references {0}, which is not part of the composition")]
    UnknownFragment(FragmentId),

    #[error(
        "logic tree too large: {nodes} nodes at depth {depth} (limits: {max_nodes} nodes, depth {max_depth})"
    )]
    TreeTooLarge {
        nodes: usize,
        depth: usize,
        max_nodes: usize,
        max_depth: usize,
    },

    /// No leaf is reachable, so the spell would do nothing.
    #[error("spell has no reachable fragment")]
    Empty,

    #[error("{fragment} is required {required} time(s) but only {owned} owned")]
    NotOwned {
        fragment: FragmentId,
        owned: u32,
        required: u32,
    },
}

impl GameError for CompositionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownFragment(_) => "COMPOSE_UNKNOWN_FRAGMENT",
            Self::TreeTooLarge { .. } => "COMPOSE_TREE_TOO_LARGE",
            Self::Empty => "COMPOSE_EMPTY",
            Self::NotOwned { .. } => "COMPOSE_NOT_OWNED",
        }
    }
}
