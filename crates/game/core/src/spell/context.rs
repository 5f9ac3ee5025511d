//! Read-only battle snapshot that spell predicates are evaluated against.

use crate::matrix::Matrix;
use crate::state::EntityId;

/// What a predicate may observe about one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantView {
    pub id: EntityId,
    pub health: Matrix,
    pub gauge: u32,
    pub gauge_max: u32,
}

/// Immutable snapshot taken once per cast, before any fold step runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleContext {
    pub caster: CombatantView,
    pub target: CombatantView,
    pub turn: u32,
}

impl BattleContext {
    pub fn new(caster: CombatantView, target: CombatantView, turn: u32) -> Self {
        Self {
            caster,
            target,
            turn,
        }
    }

    pub fn view(&self, side: Side) -> &CombatantView {
        match side {
            Side::Caster => &self.caster,
            Side::Target => &self.target,
        }
    }
}

/// Which combatant of a [`BattleContext`] a predicate inspects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Caster,
    Target,
}
