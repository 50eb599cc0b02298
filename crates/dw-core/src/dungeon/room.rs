//! Rooms and their door connections

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Coord};

/// Stable room identifier: the room's position in the map's room list
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl RoomId {
    /// The entry room
    pub const START: RoomId = RoomId(0);

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_start(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A door leading out of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomConnection {
    /// Position in the owning room's connection list
    pub local_index: usize,
    /// Room on the other side of the door
    pub target: RoomId,
    /// The shared door cell
    pub door: Coord,
}

/// A rectangular room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Interior bounding box, inclusive
    pub bounds: Bounds,
    /// Centre cell (rounded half up on even extents)
    pub center: Coord,
    /// Connections ordered by `local_index`
    pub connections: Vec<RoomConnection>,
}

impl Room {
    pub fn new(id: RoomId, bounds: Bounds, center: Coord) -> Self {
        Self {
            id,
            bounds,
            center,
            connections: Vec::new(),
        }
    }

    /// Connection by local index
    pub fn connection(&self, local_index: usize) -> Option<&RoomConnection> {
        self.connections.get(local_index)
    }

    /// Local indices of every connection, in order
    pub fn connection_indices(&self) -> Vec<usize> {
        self.connections.iter().map(|c| c.local_index).collect()
    }

    /// Check if point is inside room
    pub fn contains(&self, c: Coord) -> bool {
        self.bounds.contains(c)
    }

    pub(crate) fn push_connection(&mut self, target: RoomId, door: Coord) {
        let local_index = self.connections.len();
        self.connections.push(RoomConnection {
            local_index,
            target,
            door,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_start() {
        assert!(RoomId::START.is_start());
        assert!(!RoomId(3).is_start());
        assert_eq!(RoomId(3).index(), 3);
        assert_eq!(RoomId(12).to_string(), "12");
    }

    #[test]
    fn test_push_connection_numbers_contiguously() {
        let mut room = Room::new(RoomId(1), Bounds::new(2, 2, 4, 4), Coord::new(3, 3));
        room.push_connection(RoomId(0), Coord::new(1, 3));
        room.push_connection(RoomId(4), Coord::new(5, 2));
        room.push_connection(RoomId(2), Coord::new(3, 5));
        assert_eq!(room.connection_indices(), vec![0, 1, 2]);
        assert_eq!(room.connection(1).map(|c| c.target), Some(RoomId(4)));
        assert!(room.connection(3).is_none());
    }

    #[test]
    fn test_room_contains() {
        let room = Room::new(RoomId(0), Bounds::new(10, 5, 12, 6), Coord::new(11, 6));
        assert!(room.contains(Coord::new(10, 5)));
        assert!(room.contains(Coord::new(12, 6)));
        assert!(!room.contains(Coord::new(13, 6)));
    }

    #[test]
    fn test_room_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&RoomId(5)).unwrap(), "5");
    }
}
