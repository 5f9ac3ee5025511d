//! Procedural dungeon generator.
//!
//! [`generate_level`] is a pure function of `(run seed, depth)` and the
//! injected catalogs: the level seed is derived by hashing both values, and
//! every random decision after that is drawn from one ChaCha stream in a
//! fixed order. Calling it twice with the same inputs yields equal levels.
//!
//! Passes, in order: theme blend, room layout, stairs, enemy spawns, item
//! drops, appearance tags. Spawns and items are placed only where the open
//! cells (floor, door, stairs) stay connected to the entry.

mod grid;
mod layout;
mod population;
mod seed;
mod theme;

pub use grid::{CellKind, DungeonCell};
pub use layout::Room;
pub use population::{ItemDrop, distribute_health};
pub use seed::level_seed;
pub use theme::{ThemeBlend, select_themes};

use rand::Rng;

use crate::combat::Combatant;
use crate::env::{
    AppearanceTag, Env, FragmentOracle, OracleError, RngOracle, ThemeOracle, ThemePalette,
};
use crate::state::{EntityId, Position};

use grid::Grid;
use population::EnemyFactory;

/// One generated floor of the dungeon.
///
/// # Invariants
///
/// - `cells` is row-major, `width × height`, one kind per cell
/// - exactly one `Stairs` cell, at `stairs`
/// - every non-wall cell is reachable from `entry`, and `stairs` is reachable
///   through floor, door and stairs cells only
/// - every enemy stands on an `EnemySpawn` cell, every drop on an `Item` cell
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonLevel {
    pub depth: u32,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<DungeonCell>,
    pub rooms: Vec<Room>,
    pub entry: Position,
    pub stairs: Position,
    pub blend: ThemeBlend,
    /// Palette of the primary theme, used when cells change kind.
    pub palette: ThemePalette,
    pub enemies: Vec<Combatant>,
    pub items: Vec<ItemDrop>,
}

impl DungeonLevel {
    pub fn cell(&self, position: Position) -> Option<&DungeonCell> {
        grid::index_of(self.width, self.height, position).map(|index| &self.cells[index])
    }

    pub fn kind_at(&self, position: Position) -> Option<CellKind> {
        self.cell(position).map(|cell| cell.kind)
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }

    pub fn enemy_at(&self, position: Position) -> Option<&Combatant> {
        self.enemies.iter().find(|enemy| enemy.position == position)
    }

    pub fn item_at(&self, position: Position) -> Option<&ItemDrop> {
        self.items.iter().find(|item| item.position == position)
    }

    /// BFS step counts from the entry; `walkable` selects every non-wall
    /// cell, otherwise only open cells are traversed.
    pub fn distances_from_entry(&self, walkable: bool) -> Vec<Option<u32>> {
        let kinds: Vec<CellKind> = self.cells.iter().map(|cell| cell.kind).collect();
        let passable = if walkable {
            CellKind::is_walkable
        } else {
            CellKind::is_open
        };
        grid::distances(self.width, self.height, &kinds, self.entry, passable)
    }

    /// Removes the drop at `position`, turning its cell back into floor.
    pub fn take_item(&mut self, position: Position) -> Option<ItemDrop> {
        let index = self.items.iter().position(|item| item.position == position)?;
        let drop = self.items.remove(index);
        self.clear_cell(position);
        Some(drop)
    }

    /// Removes an enemy, turning its spawn cell back into floor.
    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Combatant> {
        let index = self.enemies.iter().position(|enemy| enemy.id == id)?;
        let enemy = self.enemies.remove(index);
        self.clear_cell(enemy.position);
        Some(enemy)
    }

    fn clear_cell(&mut self, position: Position) {
        let floor = self.palette.floor;
        if let Some(index) = grid::index_of(self.width, self.height, position) {
            let cell = &mut self.cells[index];
            cell.kind = CellKind::Floor;
            cell.appearance = floor;
        }
    }
}

/// Generates the level at `depth` of the run seeded with `run_seed`.
///
/// # Errors
///
/// Returns [`OracleError`] when `env` lacks the fragment or theme oracle, the
/// theme catalog is empty, or an enemy pool references an unknown template or
/// fragment. Well-formed catalogs never fail.
pub fn generate_level<F, T, R>(
    run_seed: u64,
    depth: u32,
    env: Env<'_, F, T, R>,
) -> Result<DungeonLevel, OracleError>
where
    F: FragmentOracle + ?Sized,
    T: ThemeOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    let fragments = env.fragments()?;
    let themes = env.themes()?;
    let config = env.config();
    let tuning = &config.dungeon;

    let seed = level_seed(run_seed, depth);
    let mut rng = seed::level_rng(seed);

    let blend = select_themes(themes.themes(), depth, &mut rng).ok_or(OracleError::NoThemes)?;
    let primary = themes.theme(blend.primary).ok_or(OracleError::NoThemes)?;
    let secondary = blend.secondary.and_then(|id| themes.theme(id));

    let (width, height) = tuning.dimensions_at(depth);
    let layout::Layout {
        mut grid,
        rooms,
        entry,
        stairs,
    } = layout::carve(width, height, tuning.rooms_at(depth), tuning, &mut rng);

    // Enemies
    let factory = EnemyFactory {
        fragments,
        themes,
        config,
        blend,
        depth,
    };
    let mut spawn_cells = population::candidates(&grid, &rooms, entry, true, &mut rng);
    let mut enemies = Vec::new();
    for slot in 0..tuning.enemies_at(depth) {
        let Some(cell) = population::claim(&mut grid, &mut spawn_cells, CellKind::EnemySpawn, entry)
        else {
            break;
        };
        match factory.spawn(EntityId(slot + 1), cell, &mut rng)? {
            Some(enemy) => enemies.push(enemy),
            None => grid.set(cell, CellKind::Floor),
        }
    }

    // Items
    let fragment_ids = fragments.fragment_ids();
    let mut items = Vec::new();
    if !fragment_ids.is_empty() {
        let mut item_cells = population::candidates(&grid, &rooms, entry, false, &mut rng);
        for _ in 0..tuning.items_at(depth) {
            let Some(cell) = population::claim(&mut grid, &mut item_cells, CellKind::Item, entry)
            else {
                break;
            };
            let fragment = fragment_ids[rng.gen_range(0..fragment_ids.len())];
            items.push(ItemDrop {
                position: cell,
                fragment,
            });
        }
    }

    let cells = paint(&grid, &blend, &primary.palette, secondary.map(|t| &t.palette), &mut rng);

    Ok(DungeonLevel {
        depth,
        seed,
        width,
        height,
        cells,
        rooms,
        entry,
        stairs,
        blend,
        palette: primary.palette,
        enemies,
        items,
    })
}

/// Assigns every cell a tag from the primary palette, or from the secondary
/// one with the blend's probability.
fn paint<G: Rng>(
    grid: &Grid,
    blend: &ThemeBlend,
    primary: &ThemePalette,
    secondary: Option<&ThemePalette>,
    rng: &mut G,
) -> Vec<DungeonCell> {
    grid.positions()
        .zip(grid.kinds().iter().copied())
        .map(|(position, kind)| {
            let roll = rng.gen_range(0..100);
            let palette = match secondary {
                Some(secondary) if blend.pick(roll) != blend.primary => secondary,
                _ => primary,
            };
            DungeonCell {
                position,
                kind,
                appearance: tag_for(palette, kind),
            }
        })
        .collect()
}

fn tag_for(palette: &ThemePalette, kind: CellKind) -> AppearanceTag {
    match kind {
        CellKind::Wall => palette.wall,
        CellKind::Floor => palette.floor,
        CellKind::Door => palette.door,
        CellKind::Item => palette.item,
        CellKind::EnemySpawn => palette.spawn,
        CellKind::Stairs => palette.stairs,
    }
}
