//! Game progression
//!
//! Tracks where the party is, which rooms it has seen and what each room
//! turned out to be. The room graph itself never changes; assigned kinds
//! live here as an overlay keyed by room id.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::dungeon::{DungeonMap, Room, RoomId};
use crate::kind::{Dice, KindHistory, RoomKind};
use crate::{START_ROOM_NAME, UNKNOWN_ROOM_NAME};

/// Rejected player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("connection {index} does not exist, this room has {available} connection(s)")]
    ConnectionOutOfRange { index: usize, available: usize },
}

/// Mutable progress of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Room the party stands in
    pub current_room: RoomId,
    /// Rooms entered so far; only grows
    pub visited: BTreeSet<RoomId>,
    /// Consumed kind die faces
    pub history: KindHistory,
    /// Kinds assigned on first visit; never holds the entry room
    pub kinds: BTreeMap<RoomId, RoomKind>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Party in the entry room, nothing else seen
    pub fn new() -> Self {
        Self {
            current_room: RoomId::START,
            visited: BTreeSet::from([RoomId::START]),
            history: KindHistory::new(),
            kinds: BTreeMap::new(),
        }
    }

    /// The room the party stands in
    pub fn current_room<'m>(&self, map: &'m DungeonMap) -> &'m Room {
        map.room(self.current_room).unwrap_or_else(|| map.start_room())
    }

    pub fn is_visited(&self, id: RoomId) -> bool {
        self.visited.contains(&id)
    }

    /// Assigned kind, `None` for the entry room and unvisited rooms
    pub fn kind_of(&self, id: RoomId) -> Option<RoomKind> {
        self.kinds.get(&id).copied()
    }

    /// Name shown to the player
    pub fn room_name(&self, id: RoomId) -> String {
        if id.is_start() {
            return START_ROOM_NAME.to_string();
        }
        match self.kind_of(id) {
            Some(kind) => kind.to_string(),
            None => UNKNOWN_ROOM_NAME.to_string(),
        }
    }

    /// Walk through connection `local_index` of the current room
    ///
    /// Entering a room for the first time rolls its kind. On error the
    /// state is left untouched.
    pub fn move_through<'m, D: Dice + ?Sized>(
        &mut self,
        map: &'m DungeonMap,
        local_index: usize,
        dice: &mut D,
    ) -> Result<&'m Room, MoveError> {
        let from = self.current_room(map);
        let Some(connection) = from.connection(local_index) else {
            warn!(
                room = %from.id,
                index = local_index,
                available = from.connections.len(),
                "move rejected"
            );
            return Err(MoveError::ConnectionOutOfRange {
                index: local_index,
                available: from.connections.len(),
            });
        };

        let target = connection.target;
        let first_visit = !self.is_visited(target);
        if first_visit && !target.is_start() {
            let kind = self.history.assign(dice);
            self.kinds.insert(target, kind);
        }
        self.visited.insert(target);
        self.current_room = target;

        info!(
            from = %from.id,
            to = %target,
            door = %connection.door,
            first_visit,
            name = %self.room_name(target),
            "party moved"
        );
        Ok(self.current_room(map))
    }

    /// Mark rooms as visited without rolling their kinds
    pub fn reveal(&mut self, rooms: impl IntoIterator<Item = RoomId>) {
        self.visited.extend(rooms);
    }

    /// Mark every room on the map as visited
    pub fn reveal_all(&mut self, map: &DungeonMap) {
        self.reveal(map.rooms().iter().map(|r| r.id));
    }

    /// Number of rooms that received `kind`
    pub fn rooms_of_kind(&self, kind: RoomKind) -> usize {
        self.kinds.values().filter(|&&k| k == kind).count()
    }
}
