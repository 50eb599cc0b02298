//! Room kinds and the first-visit dice table
//!
//! A room's kind is rolled with a d25 the first time the party enters it.
//! Each roll range maps to one kind. "Once" kinds can be handed out a single
//! time per game, "multi" kinds once per distinct die face in their range,
//! and everything else falls back to [`RoomKind::Normal`].

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};
use tracing::debug;

use crate::KIND_DIE_SIDES;

/// Thematic content of a room
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
)]
#[repr(u8)]
pub enum RoomKind {
    #[default]
    Normal = 0,
    HotSpring = 1,
    Diner = 2,
    Forest = 3,
    Shop = 4,
    Beach = 5,
    Bed = 6,
    Library = 7,
    Circus = 8,
    TreasureBox = 9,
    RedDoor = 10,
}

/// How often a kind may be handed out in one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindPolicy {
    /// At most one room
    Once,
    /// At most one room per distinct die face in the kind's range
    Multi,
    /// No limit and no bookkeeping
    Unbounded,
}

/// Die faces for each kind
const ROLL_TABLE: [(RangeInclusive<u32>, RoomKind); 11] = [
    (1..=2, RoomKind::RedDoor),
    (3..=4, RoomKind::Shop),
    (5..=6, RoomKind::HotSpring),
    (7..=8, RoomKind::Diner),
    (9..=9, RoomKind::Forest),
    (10..=10, RoomKind::Beach),
    (11..=12, RoomKind::Library),
    (13..=15, RoomKind::Bed),
    (16..=16, RoomKind::Circus),
    (17..=17, RoomKind::TreasureBox),
    (18..=25, RoomKind::Normal),
];

/// History value recorded for `Normal` at game start; never a real face
pub const NORMAL_SENTINEL: u32 = 0;

impl RoomKind {
    pub const fn policy(self) -> KindPolicy {
        match self {
            RoomKind::Normal => KindPolicy::Unbounded,
            RoomKind::Library | RoomKind::Bed => KindPolicy::Multi,
            _ => KindPolicy::Once,
        }
    }

    /// Candidate kind for a die face; faces outside the table are `Normal`
    pub fn for_roll(roll: u32) -> RoomKind {
        ROLL_TABLE
            .iter()
            .find(|(faces, _)| faces.contains(&roll))
            .map_or(RoomKind::Normal, |(_, kind)| *kind)
    }

    /// Die faces that produce this kind
    pub fn faces(self) -> RangeInclusive<u32> {
        ROLL_TABLE
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or(0..=0, |(faces, _)| faces.clone())
    }

    /// Most rooms this kind can occupy in one game
    pub fn max_rooms(self) -> Option<usize> {
        match self.policy() {
            KindPolicy::Once => Some(1),
            KindPolicy::Multi => Some(self.faces().count()),
            KindPolicy::Unbounded => None,
        }
    }

    /// Single-character map label
    pub const fn glyph(self) -> Option<char> {
        match self {
            RoomKind::Normal => None,
            RoomKind::HotSpring => Some('H'),
            RoomKind::Diner => Some('D'),
            RoomKind::Forest => Some('F'),
            RoomKind::Shop => Some('$'),
            RoomKind::Beach => Some('W'),
            RoomKind::Bed => Some('Z'),
            RoomKind::Library => Some('L'),
            RoomKind::Circus => Some('C'),
            RoomKind::TreasureBox => Some('T'),
            RoomKind::RedDoor => Some('R'),
        }
    }
}

/// Source of die rolls
pub trait Dice {
    /// Uniform value in `1..=sides`
    fn roll(&mut self, sides: u32) -> u32;
}

/// Die faces already consumed, per kind
///
/// A fixed table indexed by [`RoomKind`]. An empty slot means the kind has
/// never been handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindHistory {
    slots: [Option<Vec<u32>>; RoomKind::COUNT],
}

impl Default for KindHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl KindHistory {
    /// Fresh history with the `Normal` sentinel recorded
    pub fn new() -> Self {
        let mut history = Self::empty();
        history.slots[RoomKind::Normal as usize] = Some(vec![NORMAL_SENTINEL]);
        history
    }

    fn empty() -> Self {
        Self {
            slots: Default::default(),
        }
    }

    /// Recorded faces for `kind`, `None` if it was never handed out
    pub fn values(&self, kind: RoomKind) -> Option<&[u32]> {
        self.slots[kind as usize].as_deref()
    }

    /// Number of kinds with an entry
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a die face into the kind the room actually gets
    pub fn resolve(&mut self, roll: u32) -> RoomKind {
        let candidate = RoomKind::for_roll(roll);
        let policy = candidate.policy();
        if policy == KindPolicy::Unbounded {
            return RoomKind::Normal;
        }

        let slot = &mut self.slots[candidate as usize];
        match slot {
            None => {
                *slot = Some(vec![roll]);
                candidate
            }
            Some(faces) if policy == KindPolicy::Multi && !faces.contains(&roll) => {
                faces.push(roll);
                candidate
            }
            Some(_) => RoomKind::Normal,
        }
    }

    /// Roll the kind die and resolve the result
    pub fn assign<D: Dice + ?Sized>(&mut self, dice: &mut D) -> RoomKind {
        let roll = dice.roll(KIND_DIE_SIDES);
        let kind = self.resolve(roll);
        debug!(roll, candidate = %RoomKind::for_roll(roll), %kind, "room kind rolled");
        kind
    }
}

// Serialized as a map from kind name to recorded faces.
impl Serialize for KindHistory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for kind in RoomKind::iter() {
            if let Some(faces) = self.values(kind) {
                map.serialize_entry(&kind, faces)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KindHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = BTreeMap::<RoomKind, Vec<u32>>::deserialize(deserializer)?;
        let mut history = KindHistory::empty();
        for (kind, faces) in entries {
            history.slots[kind as usize] = Some(faces);
        }
        Ok(history)
    }
}
