//! Enemy and item placement.

use rand::Rng;
use rand::seq::SliceRandom;

use super::grid::{CellKind, Grid};
use super::layout::Room;
use super::theme::ThemeBlend;
use crate::combat::{Combatant, SpellGauge};
use crate::config::GameConfig;
use crate::env::{
    EnemyTemplate, FragmentOracle, OracleError, ThemeDescriptor, ThemeId, ThemeOracle,
};
use crate::matrix::Matrix;
use crate::spell::{FragmentId, Spell, compose_spell};
use crate::state::{EntityId, Position};

/// Fragment lying on an `Item` cell, collected by walking onto it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDrop {
    pub position: Position,
    pub fragment: FragmentId,
}

/// Splits `budget` over the four cells proportionally to `shape`.
///
/// Uses the largest-remainder method, so the resulting magnitude is exactly
/// `budget`. Negative shape cells count as zero; an all-zero shape spreads
/// evenly.
pub fn distribute_health(budget: u32, shape: Matrix) -> Matrix {
    let mut weights = shape.cells().map(|cell| u64::from(cell.max(0) as u32));
    if weights.iter().all(|w| *w == 0) {
        weights = [1; 4];
    }
    let total: u64 = weights.iter().sum();
    let budget = u64::from(budget);

    let mut cells = weights.map(|w| budget * w / total);
    let remainders = weights.map(|w| budget * w % total);
    let leftover = budget - cells.iter().sum::<u64>();

    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|a, b| remainders[*b].cmp(&remainders[*a]).then(a.cmp(b)));
    for index in order.iter().take(leftover as usize) {
        cells[*index] += 1;
    }

    Matrix::from_cells(cells.map(|cell| i32::try_from(cell).unwrap_or(i32::MAX)))
}

/// Spawn candidates: room floor cells other than the entry and stairs,
/// shuffled. Enemies skip the entry room when there is another one.
pub(super) fn candidates<G: Rng>(
    grid: &Grid,
    rooms: &[Room],
    entry: Position,
    skip_first_room: bool,
    rng: &mut G,
) -> Vec<Position> {
    let skip = usize::from(skip_first_room && rooms.len() > 1);
    let mut cells: Vec<Position> = rooms[skip..]
        .iter()
        .flat_map(Room::cells)
        .filter(|cell| *cell != entry && grid.get(*cell) == Some(CellKind::Floor))
        .collect();
    cells.shuffle(rng);
    cells
}

/// Claims the next candidate whose conversion to `kind` keeps every open
/// cell reachable from `entry`. Rejected candidates are dropped.
pub(super) fn claim(
    grid: &mut Grid,
    candidates: &mut Vec<Position>,
    kind: CellKind,
    entry: Position,
) -> Option<Position> {
    while let Some(cell) = candidates.pop() {
        if grid.get(cell) != Some(CellKind::Floor) {
            continue;
        }
        grid.set(cell, kind);
        if grid.open_cells_connected(entry) {
            return Some(cell);
        }
        grid.set(cell, CellKind::Floor);
    }
    None
}

/// Everything needed to stamp out enemies for one level.
pub(super) struct EnemyFactory<'a, F: ?Sized, T: ?Sized> {
    pub fragments: &'a F,
    pub themes: &'a T,
    pub config: &'a GameConfig,
    pub blend: ThemeBlend,
    pub depth: u32,
}

impl<F, T> EnemyFactory<'_, F, T>
where
    F: FragmentOracle + ?Sized,
    T: ThemeOracle + ?Sized,
{
    /// Draws an enemy type from the blended theme pools and builds it.
    ///
    /// Returns `Ok(None)` when both pools are empty.
    pub fn spawn<G: Rng>(
        &self,
        id: EntityId,
        position: Position,
        rng: &mut G,
    ) -> Result<Option<Combatant>, OracleError> {
        let roll = rng.gen_range(0..100);
        let Some(theme) = self.theme_with_pool(self.blend.pick(roll)) else {
            return Ok(None);
        };
        let template_id = theme.enemy_pool[rng.gen_range(0..theme.enemy_pool.len())];
        let template = self
            .themes
            .enemy_template(template_id)
            .ok_or(OracleError::EnemyTemplateNotFound(template_id))?;
        self.build(id, position, theme, template).map(Some)
    }

    /// The picked theme, or the other one when its pool is empty.
    fn theme_with_pool(&self, picked: ThemeId) -> Option<&ThemeDescriptor> {
        let fallback = if picked == self.blend.primary {
            self.blend.secondary
        } else {
            Some(self.blend.primary)
        };
        [Some(picked), fallback]
            .into_iter()
            .flatten()
            .filter_map(|id| self.themes.theme(id))
            .find(|theme| !theme.enemy_pool.is_empty())
    }

    fn build(
        &self,
        id: EntityId,
        position: Position,
        theme: &ThemeDescriptor,
        template: &EnemyTemplate,
    ) -> Result<Combatant, OracleError> {
        let tuning = &self.config.dungeon;
        let budget = tuning.health_budget_at(self.depth);
        let health = self
            .config
            .health
            .clamp(distribute_health(budget, template.health_shape));

        let regen = template
            .gauge_regen
            .saturating_add(self.depth / tuning.enemy_regen_depth_step.max(1));
        let gauge = SpellGauge::full(template.gauge_max, regen);

        let potency = u64::from(theme.difficulty_percent) * u64::from(tuning.potency_at(self.depth))
            / 100;
        let potency = u32::try_from(potency).unwrap_or(u32::MAX);
        let spells = self.spells(template, potency)?;

        let appearance = template.appearance.unwrap_or(theme.palette.enemy);
        Ok(
            Combatant::enemy(id, template.id, health, gauge, spells)
                .with_position(position)
                .with_appearance(appearance),
        )
    }

    /// Composes the unlocked recipes. Recipes whose logic fails to compose
    /// are skipped; unknown fragments are a catalog error.
    fn spells(&self, template: &EnemyTemplate, potency: u32) -> Result<Vec<Spell>, OracleError> {
        let unlocked = self.config.dungeon.unlocked_spells_at(self.depth);
        let mut spells = Vec::new();
        for recipe in template.spells.iter().take(unlocked) {
            if let Some(missing) = recipe
                .fragments
                .iter()
                .find(|id| self.fragments.fragment(**id).is_none())
            {
                return Err(OracleError::FragmentNotFound(*missing));
            }
            let fragments = self.fragments.resolve(&recipe.fragments);
            if let Ok(spell) = compose_spell(
                &fragments,
                recipe.logic(),
                &self.config.limits,
                &self.config.cost,
            ) {
                spells.push(spell.with_potency(potency, &self.config.cost));
            }
        }
        Ok(spells)
    }
}
