//! Spell model: fragments, target patterns, conditional logic and composition.
//!
//! Composition and casting are separate phases. [`compose_spell`] validates a
//! fragment list and logic tree once and caches the resulting pattern and
//! cost in a [`Spell`]; casting (see [`crate::combat`]) only evaluates it.

mod compose;
mod context;
mod error;
mod fragment;
mod logic;
mod pattern;

pub use compose::{Spell, compose_spell};
pub use context::{BattleContext, CombatantView, Side};
pub use error::CompositionError;
pub use fragment::{FragmentId, FragmentInventory, SpellFragment};
pub use logic::{ConditionalNode, Predicate};
pub use pattern::{Offset, PatternModifier, TargetPattern};
