//! Game configuration constants and tunable parameters.
//!
//! Everything here is plain data so content loaders can deserialize it from
//! `config.toml`. Every section has a `Default` so partial files are valid.

use crate::matrix::{Matrix, Operation};
use crate::spell::FragmentId;

/// Root configuration consumed by composition, battles and generation.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub limits: CompositionLimits,
    pub cost: CostWeights,
    pub health: HealthBounds,
    pub player: PlayerConfig,
    pub battle: BattleConfig,
    pub dungeon: DungeonTuning,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Maximum number of enemies engaged in a single battle.
    pub const MAX_ENCOUNTER: usize = 8;
    /// Farthest distance a derived target pattern reaches.
    pub const MAX_PATTERN_RANGE: i32 = 3;

    pub fn new() -> Self {
        Self::default()
    }
}

/// Bounds applied when a spell's logic tree is validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompositionLimits {
    /// Maximum number of nodes (logic nodes plus predicate nodes).
    pub max_nodes: usize,
    /// Maximum nesting depth of the logic tree.
    pub max_depth: usize,
}

impl Default for CompositionLimits {
    fn default() -> Self {
        Self {
            max_nodes: 32,
            max_depth: 8,
        }
    }
}

/// Coefficients of the cast cost formula.
///
/// `cost = base + Σ op_weight + Σ fragment.cost_weight
///        + pattern_cells × per_pattern_cell + Σ magnitude × per_magnitude`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostWeights {
    pub base: u32,
    pub per_pattern_cell: u32,
    pub per_magnitude: u32,
    pub add: u32,
    pub subtract: u32,
    pub multiply: u32,
    pub average: u32,
    pub reset: u32,
    pub dot_product: u32,
}

impl CostWeights {
    pub fn operation_weight(&self, op: Operation) -> u32 {
        match op {
            Operation::Add => self.add,
            Operation::Subtract => self.subtract,
            Operation::Multiply => self.multiply,
            Operation::Average => self.average,
            Operation::Reset => self.reset,
            Operation::DotProduct => self.dot_product,
        }
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            base: 1,
            per_pattern_cell: 1,
            per_magnitude: 1,
            add: 1,
            subtract: 1,
            multiply: 4,
            average: 2,
            reset: 3,
            dot_product: 5,
        }
    }
}

/// Per-cell bounds for health matrices, enforced after every fold step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealthBounds {
    pub cell_floor: i32,
    pub cell_ceiling: i32,
}

impl HealthBounds {
    pub fn clamp(&self, matrix: Matrix) -> Matrix {
        matrix.clamp(self.cell_floor, self.cell_ceiling)
    }
}

impl Default for HealthBounds {
    fn default() -> Self {
        Self {
            cell_floor: 0,
            cell_ceiling: 999,
        }
    }
}

/// Starting loadout and gauge tuning for the player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub starting_health: Matrix,
    pub gauge_max: u32,
    pub gauge_regen: u32,
    /// Every `regen_depth_step` depths the player regenerates one more point.
    pub regen_depth_step: u32,
    pub starting_fragments: Vec<(FragmentId, u32)>,
}

impl PlayerConfig {
    /// Gauge regeneration per round at the given depth.
    pub fn regen_at(&self, depth: u32) -> u32 {
        let step = self.regen_depth_step.max(1);
        self.gauge_regen.saturating_add(depth / step)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_health: Matrix::splat(12),
            gauge_max: 20,
            gauge_regen: 3,
            regen_depth_step: 4,
            starting_fragments: Vec::new(),
        }
    }
}

/// Battle resolver tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Rounds after which an unresolved battle is declared lost.
    pub max_rounds: u32,
    /// Enemies within this Manhattan distance of the one the player bumps
    /// into join the encounter.
    pub engage_radius: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_rounds: 200,
            engage_radius: 2,
        }
    }
}

/// Depth scaling for the procedural generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DungeonTuning {
    pub base_width: u32,
    pub base_height: u32,
    /// Extra columns/rows added every `growth_depth_step` depths.
    pub growth_per_step: u32,
    pub growth_depth_step: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub base_rooms: u32,
    pub rooms_depth_step: u32,
    pub max_rooms: u32,
    pub room_min_size: u32,
    pub room_max_size: u32,
    pub base_enemies: u32,
    pub enemies_depth_step: u32,
    pub max_enemies: u32,
    pub health_budget_base: u32,
    pub health_budget_per_depth: u32,
    /// Percent of extra spell potency gained per depth.
    pub potency_growth_percent: u32,
    /// Every `spell_unlock_step` depths enemies unlock one more recipe.
    pub spell_unlock_step: u32,
    pub enemy_regen_depth_step: u32,
    pub base_items: u32,
    pub items_depth_step: u32,
    pub max_items: u32,
}

impl DungeonTuning {
    /// Grid dimensions at `depth`, capped at the configured maximum.
    pub fn dimensions_at(&self, depth: u32) -> (u32, u32) {
        let growth = (depth / self.growth_depth_step.max(1)).saturating_mul(self.growth_per_step);
        (
            self.base_width.saturating_add(growth).min(self.max_width),
            self.base_height.saturating_add(growth).min(self.max_height),
        )
    }

    pub fn rooms_at(&self, depth: u32) -> u32 {
        self.base_rooms
            .saturating_add(depth / self.rooms_depth_step.max(1))
            .min(self.max_rooms)
    }

    pub fn enemies_at(&self, depth: u32) -> u32 {
        self.base_enemies
            .saturating_add(depth / self.enemies_depth_step.max(1))
            .min(self.max_enemies)
    }

    pub fn items_at(&self, depth: u32) -> u32 {
        self.base_items
            .saturating_add(depth / self.items_depth_step.max(1))
            .min(self.max_items)
    }

    /// Total health magnitude every enemy at `depth` is built with.
    pub fn health_budget_at(&self, depth: u32) -> u32 {
        self.health_budget_base
            .saturating_add(depth.saturating_mul(self.health_budget_per_depth))
    }

    /// Spell potency percent at `depth` before the theme multiplier.
    pub fn potency_at(&self, depth: u32) -> u32 {
        100u32.saturating_add(depth.saturating_mul(self.potency_growth_percent))
    }

    pub fn unlocked_spells_at(&self, depth: u32) -> usize {
        1 + (depth / self.spell_unlock_step.max(1)) as usize
    }
}

impl Default for DungeonTuning {
    fn default() -> Self {
        Self {
            base_width: 32,
            base_height: 20,
            growth_per_step: 4,
            growth_depth_step: 3,
            max_width: 80,
            max_height: 48,
            base_rooms: 4,
            rooms_depth_step: 2,
            max_rooms: 12,
            room_min_size: 3,
            room_max_size: 8,
            base_enemies: 2,
            enemies_depth_step: 2,
            max_enemies: 12,
            health_budget_base: 8,
            health_budget_per_depth: 2,
            potency_growth_percent: 5,
            spell_unlock_step: 3,
            enemy_regen_depth_step: 5,
            base_items: 2,
            items_depth_step: 3,
            max_items: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_curves_are_non_decreasing() {
        let tuning = DungeonTuning::default();
        for depth in 0..60 {
            assert!(tuning.enemies_at(depth + 1) >= tuning.enemies_at(depth));
            assert!(tuning.health_budget_at(depth + 1) >= tuning.health_budget_at(depth));
            assert!(tuning.rooms_at(depth + 1) >= tuning.rooms_at(depth));
            let (w0, h0) = tuning.dimensions_at(depth);
            let (w1, h1) = tuning.dimensions_at(depth + 1);
            assert!(w1 >= w0 && h1 >= h0);
        }
    }

    #[test]
    fn dimensions_respect_caps() {
        let tuning = DungeonTuning::default();
        assert_eq!(tuning.dimensions_at(10_000), (80, 48));
    }

    #[test]
    fn player_regen_scales_with_depth() {
        let player = PlayerConfig::default();
        assert_eq!(player.regen_at(0), 3);
        assert_eq!(player.regen_at(8), 5);
    }
}
