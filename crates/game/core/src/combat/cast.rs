//! Casting: gauge validation, regeneration and effect resolution.

use super::Combatant;
use crate::config::HealthBounds;
use crate::error::{ErrorSeverity, GameError};
use crate::matrix::{Matrix, apply};
use crate::spell::{BattleContext, Spell};
use crate::state::EntityId;

/// Errors raised while paying for a cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    #[error("insufficient gauge: spell costs {required}, {available} available")]
    InsufficientGauge { required: u32, available: u32 },
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientGauge { .. } => "CAST_INSUFFICIENT_GAUGE",
        }
    }
}

/// Proof that a cast was paid for and may be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastTicket {
    pub caster: EntityId,
    pub target: EntityId,
    pub cost: u32,
}

/// Pays for `spell` from the caster's gauge.
///
/// # Errors
///
/// Returns [`CastError::InsufficientGauge`] when the gauge is below the
/// spell's cost. The caster is left untouched in that case.
pub fn try_cast(
    caster: &mut Combatant,
    spell: &Spell,
    target: EntityId,
) -> Result<CastTicket, CastError> {
    let required = spell.cost();
    if !caster.gauge.spend(required) {
        return Err(CastError::InsufficientGauge {
            required,
            available: caster.gauge.current(),
        });
    }
    Ok(CastTicket {
        caster: caster.id,
        target,
        cost: required,
    })
}

/// Adds one round of gauge regeneration, clamped to the maximum.
pub fn regenerate_gauge(combatant: &mut Combatant) {
    combatant.gauge.regenerate();
}

/// Folds every leaf reached under `context` into `target`.
///
/// Leaves are visited left to right. After each fold step the matrix is
/// clamped to `bounds`, so a later `Average` never sees an out-of-range
/// intermediate value. Predicates always read the original snapshot.
pub fn apply_effect(
    target: Matrix,
    spell: &Spell,
    context: &BattleContext,
    bounds: &HealthBounds,
) -> Matrix {
    let mut current = bounds.clamp(target);
    spell.logic().walk(context, &mut |id| {
        if let Some(fragment) = spell.fragment(id) {
            current = bounds.clamp(apply(fragment.operation, current, fragment.matrix));
        }
    });
    current
}
