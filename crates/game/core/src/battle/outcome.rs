//! Phases, statuses and the structured event log of a battle.

use crate::matrix::Matrix;
use crate::state::EntityId;

/// Resolver state machine.
///
/// `AwaitingCommand → Validating → Resolving → CheckTerminal →
/// (AwaitingCommand | Finished)`. Between calls to
/// [`super::Battle::advance`] the battle is always in `AwaitingCommand` or
/// `Finished`; a rejected command falls back to `AwaitingCommand`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    #[default]
    AwaitingCommand,
    Validating,
    Resolving,
    CheckTerminal,
    Finished,
}

impl BattlePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattlePhase::AwaitingCommand => "awaiting_command",
            BattlePhase::Validating => "validating",
            BattlePhase::Resolving => "resolving",
            BattlePhase::CheckTerminal => "check_terminal",
            BattlePhase::Finished => "finished",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStatus {
    #[default]
    Ongoing,
    Victory,
    Defeat,
}

impl BattleStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, BattleStatus::Ongoing)
    }
}

/// Why a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FinishReason {
    EnemiesDefeated,
    PlayerDefeated,
    /// The round limit was reached without a decision.
    RoundLimit,
}

/// Something observable that happened while resolving a command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    SpellCast {
        caster: EntityId,
        target: EntityId,
        slot: usize,
        cost: u32,
    },
    Waited {
        entity: EntityId,
    },
    HealthChanged {
        entity: EntityId,
        before: Matrix,
        after: Matrix,
    },
    Defeated {
        entity: EntityId,
    },
    RoundEnded {
        round: u32,
    },
    Finished {
        status: BattleStatus,
        reason: FinishReason,
    },
}

/// Result of one accepted command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    /// Round the command was resolved in.
    pub round: u32,
    pub events: Vec<BattleEvent>,
    pub status: BattleStatus,
}
