//! Level generation
//!
//! Digs rooms that abut each other directly through single door cells.
//! There are no corridors, so every door joins exactly two rooms and the
//! level has no dead-end passages.

use tracing::debug;

use crate::geometry::{Bounds, Coord};
use crate::rng::GameRng;

use super::cell::{CellType, Grid};

/// Room interior width range, inclusive
pub const ROOM_WIDTH: (u32, u32) = (3, 9);

/// Room interior height range, inclusive
pub const ROOM_HEIGHT: (u32, u32) = (3, 5);

/// Stop digging once this percentage of the map is floor
pub const DUG_PERCENT: usize = 20;

/// Give up after this many failed or successful placement attempts
pub const MAX_ATTEMPTS: u32 = 2000;

/// A room as produced by a generator, before connections are derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRoom {
    pub bounds: Bounds,
    pub center: Coord,
    /// Door cells on this room's wall ring, in generator order
    pub doors: Vec<Coord>,
}

/// Raw generator output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDungeon {
    pub width: u32,
    pub height: u32,
    /// Rooms in generator order; index 0 is the entry room
    pub rooms: Vec<RawRoom>,
}

/// Source of raw room layouts
///
/// Implementations must return the entry room first and must only produce
/// doors that sit on the wall rings of exactly two rooms. The topology
/// builder checks the second property and rejects layouts that break it.
pub trait DungeonGenerator {
    fn generate(&self, width: u32, height: u32, seed: u64) -> RawDungeon;
}

/// Room-digging generator with zero-length corridors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digger {
    pub room_width: (u32, u32),
    pub room_height: (u32, u32),
    pub dug_percent: usize,
    pub max_attempts: u32,
}

impl Default for Digger {
    fn default() -> Self {
        Self {
            room_width: ROOM_WIDTH,
            room_height: ROOM_HEIGHT,
            dug_percent: DUG_PERCENT,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// Wall side of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    North,
    South,
    West,
    East,
}

impl Side {
    const ALL: [Side; 4] = [Side::North, Side::South, Side::West, Side::East];

    /// Unit step pointing away from the room
    const fn outward(self) -> (i64, i64) {
        match self {
            Side::North => (0, -1),
            Side::South => (0, 1),
            Side::West => (-1, 0),
            Side::East => (1, 0),
        }
    }
}

/// Signed interior rectangle used while validating a candidate room
#[derive(Debug, Clone, Copy)]
struct Candidate {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl Candidate {
    fn on_ring(&self, x: i64, y: i64) -> bool {
        x == self.left - 1 || x == self.right + 1 || y == self.top - 1 || y == self.bottom + 1
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(
            self.left as u32,
            self.top as u32,
            self.right as u32,
            self.bottom as u32,
        )
    }
}

impl DungeonGenerator for Digger {
    fn generate(&self, width: u32, height: u32, seed: u64) -> RawDungeon {
        let mut rng = GameRng::new(seed);
        let mut grid = Grid::new(width, height);
        let mut rooms: Vec<Bounds> = Vec::new();

        if let Some(first) = self.first_room(&grid, &mut rng) {
            dig_room(&mut grid, &first);
            rooms.push(first.bounds());
        }

        let mut attempts = 0;
        while !rooms.is_empty() && attempts < self.max_attempts {
            if grid.dug_count() * 100 > grid.area() * self.dug_percent {
                break;
            }
            attempts += 1;

            let Some(parent) = rng.choose(&rooms).copied() else {
                break;
            };
            let side = Side::ALL[rng.rn2(4) as usize];
            if let Some((door, room)) = self.try_attach(&grid, &parent, side, &mut rng) {
                dig_room(&mut grid, &room);
                grid.set(door, CellType::Door);
                rooms.push(room.bounds());
            }
        }

        debug!(
            rooms = rooms.len(),
            attempts,
            dug = grid.dug_count(),
            "digger finished"
        );

        let rooms = rooms
            .into_iter()
            .map(|bounds| RawRoom {
                bounds,
                center: Coord::new(
                    (bounds.left + bounds.right + 1) / 2,
                    (bounds.top + bounds.bottom + 1) / 2,
                ),
                doors: ring_doors(&grid, &bounds),
            })
            .collect();

        RawDungeon {
            width,
            height,
            rooms,
        }
    }
}

impl Digger {
    fn random_size(&self, rng: &mut GameRng) -> (i64, i64) {
        let w = rng.range(self.room_width.0.max(1), self.room_width.1);
        let h = rng.range(self.room_height.0.max(1), self.room_height.1);
        (w as i64, h as i64)
    }

    /// Entry room centred on the map
    fn first_room(&self, grid: &Grid, rng: &mut GameRng) -> Option<Candidate> {
        let (w, h) = self.random_size(rng);
        let cx = grid.width() as i64 / 2;
        let cy = grid.height() as i64 / 2;
        let left = cx - w / 2;
        let top = cy - h / 2;
        let room = Candidate {
            left,
            top,
            right: left + w - 1,
            bottom: top + h - 1,
        };
        fits(grid, &room, None).then_some(room)
    }

    /// Try to open a door in `parent`'s `side` wall and dig a room behind it
    fn try_attach(
        &self,
        grid: &Grid,
        parent: &Bounds,
        side: Side,
        rng: &mut GameRng,
    ) -> Option<(Coord, Candidate)> {
        let (pl, pt, pr, pb) = (
            parent.left as i64,
            parent.top as i64,
            parent.right as i64,
            parent.bottom as i64,
        );
        let (door_x, door_y) = match side {
            Side::North => (rng.range(parent.left, parent.right) as i64, pt - 1),
            Side::South => (rng.range(parent.left, parent.right) as i64, pb + 1),
            Side::West => (pl - 1, rng.range(parent.top, parent.bottom) as i64),
            Side::East => (pr + 1, rng.range(parent.top, parent.bottom) as i64),
        };
        let (dx, dy) = side.outward();

        // The door must still be plain wall and the cell behind it untouched.
        if grid.get(door_x, door_y) != Some(CellType::Wall) {
            return None;
        }
        if grid.get(door_x + dx, door_y + dy) != Some(CellType::Stone) {
            return None;
        }

        let (w, h) = self.random_size(rng);
        let room = match side {
            Side::North | Side::South => {
                let left = door_x - rng.rn2(w as u32) as i64;
                let (top, bottom) = if side == Side::North {
                    (door_y - h, door_y - 1)
                } else {
                    (door_y + 1, door_y + h)
                };
                Candidate {
                    left,
                    top,
                    right: left + w - 1,
                    bottom,
                }
            }
            Side::West | Side::East => {
                let top = door_y - rng.rn2(h as u32) as i64;
                let (left, right) = if side == Side::West {
                    (door_x - w, door_x - 1)
                } else {
                    (door_x + 1, door_x + w)
                };
                Candidate {
                    left,
                    top,
                    right,
                    bottom: top + h - 1,
                }
            }
        };

        let door = Coord::new(door_x as u32, door_y as u32);
        fits(grid, &room, Some(door)).then_some((door, room))
    }
}

/// Interior must be stone, ring must be stone or wall, all inside the map
fn fits(grid: &Grid, room: &Candidate, door: Option<Coord>) -> bool {
    if room.left < 1 || room.top < 1 {
        return false;
    }
    for x in (room.left - 1)..=(room.right + 1) {
        for y in (room.top - 1)..=(room.bottom + 1) {
            let Some(cell) = grid.get(x, y) else {
                return false;
            };
            let ok = if room.on_ring(x, y) {
                cell.accepts_wall()
                    || door.is_some_and(|d| d.x as i64 == x && d.y as i64 == y)
            } else {
                cell == CellType::Stone
            };
            if !ok {
                return false;
            }
        }
    }
    true
}

fn dig_room(grid: &mut Grid, room: &Candidate) {
    for x in (room.left - 1)..=(room.right + 1) {
        for y in (room.top - 1)..=(room.bottom + 1) {
            let c = Coord::new(x as u32, y as u32);
            if room.on_ring(x, y) {
                if grid.get(x, y) == Some(CellType::Stone) {
                    grid.set(c, CellType::Wall);
                }
            } else {
                grid.set(c, CellType::Floor);
            }
        }
    }
}

/// Door cells on the wall ring, scanned column by column
fn ring_doors(grid: &Grid, bounds: &Bounds) -> Vec<Coord> {
    let (left, top, right, bottom) = (
        bounds.left as i64 - 1,
        bounds.top as i64 - 1,
        bounds.right as i64 + 1,
        bounds.bottom as i64 + 1,
    );
    let mut doors = Vec::new();
    for x in left..=right {
        for y in top..=bottom {
            let on_ring = x == left || x == right || y == top || y == bottom;
            if on_ring && grid.get(x, y) == Some(CellType::Door) {
                doors.push(Coord::new(x as u32, y as u32));
            }
        }
    }
    doors
}
