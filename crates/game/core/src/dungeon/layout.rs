//! Rooms, corridors, doors and stairs.

use rand::Rng;

use super::grid::{CellKind, Grid};
use crate::config::DungeonTuning;
use crate::state::Position;

/// Placement attempts per requested room before giving up on it.
const ROOM_ATTEMPTS: u32 = 24;

/// Axis-aligned rectangle of floor cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn centre(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x < self.x + self.width
            && position.y >= self.y
            && position.y < self.y + self.height
    }

    /// True when the rooms overlap or touch without a wall between them.
    fn crowds(&self, other: &Room) -> bool {
        other.x <= self.x + self.width
            && self.x <= other.x + other.width
            && other.y <= self.y + self.height
            && self.y <= other.y + other.height
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Position::new(x, y)))
    }
}

/// Carved grid plus the metadata later passes need.
pub(super) struct Layout {
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub entry: Position,
    pub stairs: Position,
}

/// Builds the room-and-corridor layout of a `width × height` grid.
///
/// Rooms never overlap and are chained in placement order by L-shaped
/// corridors, so every carved cell is reachable from the entry. The entry is
/// the centre of the first room; the single stairs cell is the centre of the
/// room farthest from it by path length.
pub(super) fn carve<G: Rng>(
    width: u32,
    height: u32,
    target_rooms: u32,
    tuning: &DungeonTuning,
    rng: &mut G,
) -> Layout {
    let mut grid = Grid::filled(width, height, CellKind::Wall);
    let rooms = place_rooms(width as i32, height as i32, target_rooms, tuning, rng);

    for room in &rooms {
        for cell in room.cells() {
            grid.set(cell, CellKind::Floor);
        }
    }
    for pair in rooms.windows(2) {
        connect(&mut grid, pair[0].centre(), pair[1].centre(), rng);
    }
    mark_doors(&mut grid, &rooms);

    let entry = rooms[0].centre();
    let stairs = pick_stairs(&grid, &rooms, entry);
    grid.set(stairs, CellKind::Stairs);

    Layout {
        grid,
        rooms,
        entry,
        stairs,
    }
}

fn place_rooms<G: Rng>(
    width: i32,
    height: i32,
    target: u32,
    tuning: &DungeonTuning,
    rng: &mut G,
) -> Vec<Room> {
    // Keep a one-cell wall border around the grid.
    let max_side_w = (width - 2).max(1);
    let max_side_h = (height - 2).max(1);
    let min_size = (tuning.room_min_size as i32).max(1);
    let max_size = (tuning.room_max_size as i32).max(min_size);

    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..target.saturating_mul(ROOM_ATTEMPTS) {
        if rooms.len() as u32 >= target {
            break;
        }
        let room_w = rng.gen_range(min_size..=max_size).min(max_side_w);
        let room_h = rng.gen_range(min_size..=max_size).min(max_side_h);
        let x = rng.gen_range(1..=(width - room_w - 1).max(1));
        let y = rng.gen_range(1..=(height - room_h - 1).max(1));
        let room = Room {
            x,
            y,
            width: room_w,
            height: room_h,
        };
        if rooms.iter().all(|other| !room.crowds(other)) {
            rooms.push(room);
        }
    }

    if rooms.is_empty() {
        rooms.push(Room {
            x: 1,
            y: 1,
            width: min_size.min(max_side_w),
            height: min_size.min(max_side_h),
        });
    }
    rooms
}

/// Carves an L-shaped corridor, horizontal or vertical leg first at random.
fn connect<G: Rng>(grid: &mut Grid, from: Position, to: Position, rng: &mut G) {
    let corner = if rng.gen_bool(0.5) {
        Position::new(to.x, from.y)
    } else {
        Position::new(from.x, to.y)
    };
    carve_line(grid, from, corner);
    carve_line(grid, corner, to);
}

fn carve_line(grid: &mut Grid, from: Position, to: Position) {
    let step_x = (to.x - from.x).signum();
    let step_y = (to.y - from.y).signum();
    let mut cursor = from;
    loop {
        if grid.get(cursor) == Some(CellKind::Wall) {
            grid.set(cursor, CellKind::Floor);
        }
        if cursor == to {
            break;
        }
        cursor = cursor.offset(step_x, step_y);
    }
}

/// A corridor cell on a room's wall ring becomes a door when it leads
/// straight into the room: room floor on one side, carved cell on the other.
fn mark_doors(grid: &mut Grid, rooms: &[Room]) {
    let in_any_room = |position: Position| rooms.iter().any(|room| room.contains(position));
    let mut doors = Vec::new();
    for room in rooms {
        let ring = Room {
            x: room.x - 1,
            y: room.y - 1,
            width: room.width + 2,
            height: room.height + 2,
        };
        for cell in ring.cells().filter(|cell| !room.contains(*cell)) {
            if in_any_room(cell) || grid.get(cell) != Some(CellKind::Floor) {
                continue;
            }
            let pierces = [(0, 1), (1, 0), (0, -1), (-1, 0)].iter().any(|&(dx, dy)| {
                room.contains(cell.offset(dx, dy))
                    && grid
                        .get(cell.offset(-dx, -dy))
                        .is_some_and(|kind| kind.is_walkable())
            });
            if pierces {
                doors.push(cell);
            }
        }
    }
    for door in doors {
        grid.set(door, CellKind::Door);
    }
}

fn pick_stairs(grid: &Grid, rooms: &[Room], entry: Position) -> Position {
    let distances = grid.distances(entry, CellKind::is_open);
    let width = grid.width() as usize;
    let distance_to = |position: Position| {
        distances
            .get(position.y as usize * width + position.x as usize)
            .copied()
            .flatten()
            .unwrap_or(0)
    };

    // Later rooms win ties so the stairs sit deeper in the chain.
    let farthest = rooms
        .iter()
        .enumerate()
        .max_by_key(|(index, room)| (distance_to(room.centre()), *index))
        .map(|(index, room)| (index, *room));

    match farthest {
        Some((index, room)) if index > 0 && room.centre() != entry => room.centre(),
        // Single room: the cell of the first room farthest from its centre.
        _ => rooms[0]
            .cells()
            .filter(|cell| *cell != entry)
            .max_by_key(|cell| (distance_to(*cell), *cell))
            .unwrap_or(entry),
    }
}
