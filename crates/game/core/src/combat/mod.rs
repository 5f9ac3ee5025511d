//! Gauge and combatant state.
//!
//! [`try_cast`] pays for a spell, [`apply_effect`] resolves it against a
//! health matrix and [`regenerate_gauge`] runs at every round boundary.

mod cast;
mod combatant;
mod gauge;

pub use cast::{CastError, CastTicket, apply_effect, regenerate_gauge, try_cast};
pub use combatant::{Combatant, CombatantKind, Loadout};
pub use gauge::SpellGauge;
