//! Deterministic simulation core of the matrix-spell dungeon crawler.
//!
//! `game-core` defines the canonical rules (matrix algebra, spells, battles,
//! level generation, run state) as pure APIs that the runtime and offline
//! tools share. Catalogs and randomness are injected through [`env::Env`];
//! the crate performs no I/O and never formats output for display.
pub mod battle;
pub mod combat;
pub mod config;
pub mod dungeon;
pub mod env;
pub mod error;
pub mod matrix;
pub mod spell;
pub mod state;

#[cfg(test)]
mod testing;

pub use battle::{
    Battle, BattleCommand, BattleError, BattleEvent, BattleOutcome, BattlePhase, BattleStatus,
    FinishReason,
};
pub use combat::{
    CastError, CastTicket, Combatant, CombatantKind, Loadout, SpellGauge, apply_effect,
    regenerate_gauge, try_cast,
};
pub use config::GameConfig;
pub use dungeon::{CellKind, DungeonCell, DungeonLevel, ItemDrop, ThemeBlend, generate_level};
pub use env::{
    AppearanceTag, CatalogSnapshot, EnemyTemplate, EnemyTemplateId, Env, FragmentOracle, GameEnv,
    OracleError, PcgRng, RngOracle, SpellRecipe, ThemeDescriptor, ThemeId, ThemeOracle,
    ThemePalette, WeightCurve,
};
pub use error::{ErrorSeverity, GameError};
pub use matrix::{Matrix, Operation};
pub use spell::{
    BattleContext, CompositionError, ConditionalNode, FragmentId, FragmentInventory, Offset,
    PatternModifier, Predicate, Side, Spell, SpellFragment, TargetPattern, compose_spell,
};
pub use state::{
    Direction, EntityId, Position, RunError, RunPhase, RunState, RunSummary, SaveError,
    StepOutcome,
};
#[cfg(feature = "serde")]
pub use state::{deserialize_run_state, serialize_run_state};
