//! Cell kinds and the working grid used during generation.

use std::collections::VecDeque;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::env::AppearanceTag;
use crate::state::Position;

/// Exhaustive classification of a dungeon cell.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CellKind {
    #[default]
    Wall,
    Floor,
    Door,
    Item,
    EnemySpawn,
    Stairs,
}

impl CellKind {
    /// Cells a path between entry and stairs may use.
    pub fn is_open(self) -> bool {
        matches!(self, CellKind::Floor | CellKind::Door | CellKind::Stairs)
    }

    /// Cells the player can stand on (everything but walls).
    pub fn is_walkable(self) -> bool {
        !matches!(self, CellKind::Wall)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonCell {
    pub position: Position,
    pub kind: CellKind,
    pub appearance: AppearanceTag,
}

/// Row-major kind grid, the scratch space of the generator.
#[derive(Clone, Debug)]
pub(super) struct Grid {
    width: u32,
    height: u32,
    kinds: Vec<CellKind>,
}

impl Grid {
    pub fn filled(width: u32, height: u32, kind: CellKind) -> Self {
        Self {
            width,
            height,
            kinds: vec![kind; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    fn index(&self, position: Position) -> Option<usize> {
        index_of(self.width, self.height, position)
    }

    pub fn get(&self, position: Position) -> Option<CellKind> {
        self.index(position).map(|index| self.kinds[index])
    }

    pub fn set(&mut self, position: Position, kind: CellKind) {
        if let Some(index) = self.index(position) {
            self.kinds[index] = kind;
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        positions(self.width, self.height)
    }

    pub fn kinds(&self) -> &[CellKind] {
        &self.kinds
    }

    /// BFS step counts from `start` over cells accepted by `passable`.
    /// Unreached cells hold `None`.
    pub fn distances(&self, start: Position, passable: impl Fn(CellKind) -> bool) -> Vec<Option<u32>> {
        distances(self.width, self.height, &self.kinds, start, passable)
    }

    /// True when every open cell is reachable from `start` through open cells.
    pub fn open_cells_connected(&self, start: Position) -> bool {
        let reached = self.distances(start, CellKind::is_open);
        self.kinds
            .iter()
            .zip(reached)
            .all(|(kind, distance)| !kind.is_open() || distance.is_some())
    }
}

pub(super) fn index_of(width: u32, height: u32, position: Position) -> Option<usize> {
    if position.x < 0 || position.y < 0 {
        return None;
    }
    let (x, y) = (position.x as u32, position.y as u32);
    if x >= width || y >= height {
        return None;
    }
    Some((y as usize) * (width as usize) + x as usize)
}

pub(super) fn positions(width: u32, height: u32) -> impl Iterator<Item = Position> {
    (0..height as i32).flat_map(move |y| (0..width as i32).map(move |x| Position::new(x, y)))
}

pub(super) fn distances(
    width: u32,
    height: u32,
    kinds: &[CellKind],
    start: Position,
    passable: impl Fn(CellKind) -> bool,
) -> Vec<Option<u32>> {
    let mut reached = vec![None; kinds.len()];
    let Some(start_index) = index_of(width, height, start) else {
        return reached;
    };
    if !passable(kinds[start_index]) {
        return reached;
    }

    let mut queue = VecDeque::from([(start, 0u32)]);
    reached[start_index] = Some(0);
    while let Some((position, distance)) = queue.pop_front() {
        for next in position.neighbours() {
            let Some(index) = index_of(width, height, next) else {
                continue;
            };
            if reached[index].is_none() && passable(kinds[index]) {
                reached[index] = Some(distance + 1);
                queue.push_back((next, distance + 1));
            }
        }
    }
    reached
}
