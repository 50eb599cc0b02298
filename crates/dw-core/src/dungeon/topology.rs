//! Dungeon topology
//!
//! Turns raw generator output into an immutable room graph. Room ids follow
//! the generator's room order and each room's connections are numbered in the
//! order its doors are first seen across the whole map, so a fixed seed always
//! yields the same ids and local indices.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::geometry::Coord;

use super::generation::{Digger, DungeonGenerator, RawDungeon};
use super::room::{Room, RoomId};

/// Construction-time consistency failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("generator produced no entry room")]
    NoRooms,

    #[error("door at {door} is owned by rooms {owners:?}, expected exactly two")]
    DoorOwnership { door: Coord, owners: Vec<RoomId> },
}

/// Immutable room graph for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonMap {
    width: u32,
    height: u32,
    rooms: Vec<Room>,
    /// Every distinct door cell, first-seen order. Rendering aid only.
    doors: Vec<Coord>,
}

impl DungeonMap {
    /// Build a map with the default digging generator
    pub fn build(width: u32, height: u32, seed: u64) -> Result<Self, TopologyError> {
        Self::build_with(&Digger::default(), width, height, seed)
    }

    /// Build a map from any generator
    pub fn build_with<G: DungeonGenerator + ?Sized>(
        generator: &G,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, TopologyError> {
        if width == 0 || height == 0 {
            return Err(TopologyError::InvalidDimensions { width, height });
        }
        let map = Self::from_raw(generator.generate(width, height, seed))?;
        debug!(
            seed,
            width,
            height,
            rooms = map.rooms.len(),
            doors = map.doors.len(),
            "dungeon built"
        );
        Ok(map)
    }

    /// Derive the room graph from raw generator output
    pub fn from_raw(raw: RawDungeon) -> Result<Self, TopologyError> {
        if raw.rooms.is_empty() {
            return Err(TopologyError::NoRooms);
        }

        let mut owners: BTreeMap<Coord, Vec<RoomId>> = BTreeMap::new();
        let mut doors = Vec::new();
        for (idx, raw_room) in raw.rooms.iter().enumerate() {
            let id = RoomId(idx as u32);
            for door in &raw_room.doors {
                let entry = owners.entry(*door).or_default();
                if entry.is_empty() {
                    doors.push(*door);
                }
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        }

        // Connections are numbered in map-wide first-seen door order, not in
        // the order a room lists its own doors.
        let mut rooms = Vec::with_capacity(raw.rooms.len());
        for (idx, raw_room) in raw.rooms.into_iter().enumerate() {
            let id = RoomId(idx as u32);
            let mut room = Room::new(id, raw_room.bounds, raw_room.center);
            for &door in &doors {
                let sharing = owners.get(&door).map(Vec::as_slice).unwrap_or_default();
                if !sharing.contains(&id) {
                    continue;
                }
                let others: Vec<RoomId> = sharing.iter().copied().filter(|&o| o != id).collect();
                match others.as_slice() {
                    [target] => room.push_connection(*target, door),
                    _ => {
                        return Err(TopologyError::DoorOwnership {
                            door,
                            owners: sharing.to_vec(),
                        });
                    }
                }
            }
            rooms.push(room);
        }

        Ok(Self {
            width: raw.width,
            height: raw.height,
            rooms,
            doors,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    /// The entry room, always present
    pub fn start_room(&self) -> &Room {
        &self.rooms[0]
    }

    /// Door cells of the whole map
    pub fn doors(&self) -> &[Coord] {
        &self.doors
    }

    /// Room whose interior contains `c`
    pub fn room_at(&self, c: Coord) -> Option<&Room> {
        self.rooms.iter().find(|r| r.contains(c))
    }

    pub fn contains_room(&self, id: RoomId) -> bool {
        id.index() < self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generation::RawRoom;
    use crate::geometry::Bounds;
    use crate::{DEFAULT_HEIGHT, DEFAULT_SEED, DEFAULT_WIDTH};

    fn raw_room(left: u32, top: u32, right: u32, bottom: u32, doors: &[(u32, u32)]) -> RawRoom {
        RawRoom {
            bounds: Bounds::new(left, top, right, bottom),
            center: Coord::new((left + right + 1) / 2, (top + bottom + 1) / 2),
            doors: doors.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
        }
    }

    /// Three rooms in a row: 0 | 1 | 2, doors at x=5 and x=9
    fn corridorless_row() -> RawDungeon {
        RawDungeon {
            width: 20,
            height: 10,
            rooms: vec![
                raw_room(6, 2, 8, 4, &[(5, 3), (9, 3)]),
                raw_room(2, 2, 4, 4, &[(5, 3)]),
                raw_room(10, 2, 12, 4, &[(9, 3)]),
            ],
        }
    }

    #[test]
    fn test_from_raw_links_rooms() {
        let map = DungeonMap::from_raw(corridorless_row()).unwrap();
        assert_eq!(map.room_count(), 3);

        let start = map.start_room();
        assert_eq!(start.connections.len(), 2);
        assert_eq!(start.connections[0].local_index, 0);
        assert_eq!(start.connections[0].target, RoomId(1));
        assert_eq!(start.connections[0].door, Coord::new(5, 3));
        assert_eq!(start.connections[1].local_index, 1);
        assert_eq!(start.connections[1].target, RoomId(2));

        let west = map.room(RoomId(1)).unwrap();
        assert_eq!(west.connections.len(), 1);
        assert_eq!(west.connections[0].target, RoomId(0));
        assert_eq!(map.doors(), &[Coord::new(5, 3), Coord::new(9, 3)]);
    }

    #[test]
    fn test_connections_follow_first_seen_door_order() {
        // Room 1 lists its east door first, but the west door was seen
        // earlier on the map (through room 0), so it gets index 0.
        let raw = RawDungeon {
            width: 20,
            height: 10,
            rooms: vec![
                raw_room(2, 2, 4, 4, &[(5, 3)]),
                raw_room(6, 2, 8, 4, &[(9, 3), (5, 3)]),
                raw_room(10, 2, 12, 4, &[(9, 3)]),
            ],
        };
        let map = DungeonMap::from_raw(raw).unwrap();
        assert_eq!(map.doors(), &[Coord::new(5, 3), Coord::new(9, 3)]);

        let middle = map.room(RoomId(1)).unwrap();
        assert_eq!(middle.connections[0].door, Coord::new(5, 3));
        assert_eq!(middle.connections[0].target, RoomId(0));
        assert_eq!(middle.connections[1].door, Coord::new(9, 3));
        assert_eq!(middle.connections[1].target, RoomId(2));
        assert_eq!(middle.connection_indices(), vec![0, 1]);
    }

    #[test]
    fn test_connections_match_door_list_order() {
        let map = DungeonMap::build(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_SEED).unwrap();
        for room in map.rooms() {
            let positions: Vec<usize> = room
                .connections
                .iter()
                .filter_map(|c| map.doors().iter().position(|d| *d == c.door))
                .collect();
            assert_eq!(positions.len(), room.connections.len());
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "room {}", room.id);
        }
    }

    #[test]
    fn test_door_with_single_owner_is_rejected() {
        let mut raw = corridorless_row();
        raw.rooms[2].doors.clear();
        let err = DungeonMap::from_raw(raw).unwrap_err();
        assert_eq!(
            err,
            TopologyError::DoorOwnership {
                door: Coord::new(9, 3),
                owners: vec![RoomId(0)],
            }
        );
    }

    #[test]
    fn test_door_with_three_owners_is_rejected() {
        let mut raw = corridorless_row();
        raw.rooms.push(raw_room(6, 6, 8, 8, &[(5, 3)]));
        let err = DungeonMap::from_raw(raw).unwrap_err();
        assert!(matches!(err, TopologyError::DoorOwnership { ref owners, .. } if owners.len() == 3));
    }

    #[test]
    fn test_empty_generator_output_is_rejected() {
        let raw = RawDungeon {
            width: 10,
            height: 10,
            rooms: Vec::new(),
        };
        assert_eq!(DungeonMap::from_raw(raw), Err(TopologyError::NoRooms));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert_eq!(
            DungeonMap::build(0, 40, DEFAULT_SEED),
            Err(TopologyError::InvalidDimensions { width: 0, height: 40 })
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = DungeonMap::build(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_SEED).unwrap();
        let b = DungeonMap::build(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_SEED).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_connections_are_symmetric() {
        let map = DungeonMap::build(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_SEED).unwrap();
        for room in map.rooms() {
            for conn in &room.connections {
                let other = map.room(conn.target).unwrap();
                assert!(
                    other
                        .connections
                        .iter()
                        .any(|c| c.target == room.id && c.door == conn.door)
                );
            }
        }
    }

    #[test]
    fn test_room_at() {
        let map = DungeonMap::from_raw(corridorless_row()).unwrap();
        assert_eq!(map.room_at(Coord::new(3, 3)).map(|r| r.id), Some(RoomId(1)));
        assert_eq!(map.room_at(Coord::new(7, 2)).map(|r| r.id), Some(RoomId(0)));
        // Doors and walls belong to no room.
        assert!(map.room_at(Coord::new(5, 3)).is_none());
        assert!(map.room_at(Coord::new(0, 0)).is_none());
    }
}
