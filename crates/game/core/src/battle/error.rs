//! Battle resolver errors.

use crate::combat::CastError;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;

/// Reasons a command was rejected or a battle could not be set up.
///
/// Rejected commands never consume a round and never mutate the battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleError {
    #[error("insufficient gauge: spell costs {required}, {available} available")]
    InsufficientGauge { required: u32, available: u32 },

    #[error("no spell in slot {slot}")]
    UnknownSpell { slot: usize },

    #[error("{0} is not part of this battle")]
    UnknownTarget(EntityId),

    #[error("{0} is already defeated")]
    TargetDefeated(EntityId),

    #[error("battle is already finished")]
    Finished,

    #[error("an encounter needs at least one enemy")]
    EmptyEncounter,

    #[error("encounter of {count} enemies exceeds the limit of {max}")]
    EncounterTooLarge { count: usize, max: usize },

    #[error("{0} appears more than once in the encounter")]
    DuplicateCombatant(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl From<CastError> for BattleError {
    fn from(err: CastError) -> Self {
        match err {
            CastError::InsufficientGauge {
                required,
                available,
            } => Self::InsufficientGauge {
                required,
                available,
            },
        }
    }
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        use BattleError::*;
        match self {
            InsufficientGauge { .. }
            | UnknownSpell { .. }
            | UnknownTarget(_)
            | TargetDefeated(_)
            | Finished => ErrorSeverity::Recoverable,
            EmptyEncounter | EncounterTooLarge { .. } | DuplicateCombatant(_) => {
                ErrorSeverity::Validation
            }
            Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            InsufficientGauge { .. } => "BATTLE_INSUFFICIENT_GAUGE",
            UnknownSpell { .. } => "BATTLE_UNKNOWN_SPELL",
            UnknownTarget(_) => "BATTLE_UNKNOWN_TARGET",
            TargetDefeated(_) => "BATTLE_TARGET_DEFEATED",
            Finished => "BATTLE_FINISHED",
            EmptyEncounter => "BATTLE_EMPTY_ENCOUNTER",
            EncounterTooLarge { .. } => "BATTLE_ENCOUNTER_TOO_LARGE",
            DuplicateCombatant(_) => "BATTLE_DUPLICATE_COMBATANT",
            Oracle(err) => err.error_code(),
        }
    }
}
