//! Dungeon system
//!
//! Contains the digging generator, cells, rooms and the room graph.

mod cell;
mod generation;
mod room;
mod topology;

pub use cell::{CellType, Grid};
pub use generation::{
    DUG_PERCENT, Digger, DungeonGenerator, MAX_ATTEMPTS, ROOM_HEIGHT, ROOM_WIDTH, RawDungeon,
    RawRoom,
};
pub use room::{Room, RoomConnection, RoomId};
pub use topology::{DungeonMap, TopologyError};
