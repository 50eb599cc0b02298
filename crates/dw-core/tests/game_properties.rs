use std::collections::{BTreeSet, HashMap, VecDeque};

use dw_core::dungeon::{DungeonMap, RoomId};
use dw_core::geometry::{Bounds, Coord};
use dw_core::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, Dice, GameRng, GameState, KindPolicy, MoveError, Room, RoomKind,
    Scale, point_to_pixel, room_center_to_pixel,
};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn build(seed: u64) -> DungeonMap {
    DungeonMap::build(DEFAULT_WIDTH, DEFAULT_HEIGHT, seed).unwrap()
}

/// Dice that replay a script, then fall back to a Normal face
struct Script(VecDeque<u32>);

impl Dice for Script {
    fn roll(&mut self, _sides: u32) -> u32 {
        self.0.pop_front().unwrap_or(20)
    }
}

#[test]
fn test_fixed_seed_rebuilds_identical_map() {
    let a = build(1234);
    let b = build(1234);
    assert_eq!(a.room_count(), b.room_count());
    for (ra, rb) in a.rooms().iter().zip(b.rooms()) {
        assert_eq!(ra.id, rb.id);
        assert_eq!(ra.bounds, rb.bounds);
        assert_eq!(ra.connections, rb.connections);
    }
}

#[test]
fn test_seed_1234_scenario() {
    let map = build(1234);
    let mut state = GameState::new();
    assert!(map.room(RoomId::START).is_some());
    assert!(state.is_visited(RoomId::START));
    assert_eq!(state.kind_of(RoomId::START), None);

    let target = map.start_room().connections[0].target;
    let mut dice = GameRng::new(99);
    let room = state.move_through(&map, 0, &mut dice).unwrap();
    assert_eq!(room.id, target);
    assert_eq!(state.current_room, target);
    assert!(state.is_visited(target));
    assert!(state.kind_of(target).is_some());
}

#[test]
fn test_exhausted_red_door_rolls_normal() {
    let map = build(1234);
    let mut state = GameState::new();
    let mut dice = Script(VecDeque::from([1]));

    state.move_through(&map, 0, &mut dice).unwrap();
    let first = state.current_room;
    assert_eq!(state.kind_of(first), Some(RoomKind::RedDoor));

    // Walk until we reach a room we have not seen, then roll RedDoor again.
    let mut rng = GameRng::new(1);
    for _ in 0..500 {
        let room = state.current_room(&map);
        let pick = rng.rn2(room.connections.len() as u32) as usize;
        let next = room.connections[pick].target;
        if !state.is_visited(next) {
            dice.0.push_back(2);
            state.move_through(&map, pick, &mut dice).unwrap();
            assert_eq!(state.kind_of(next), Some(RoomKind::Normal));
            assert_eq!(state.rooms_of_kind(RoomKind::RedDoor), 1);
            return;
        }
        state.move_through(&map, pick, &mut dice).unwrap();
    }
    panic!("never found a second unvisited room");
}

#[test]
fn test_unit_room_center_matches_point() {
    let room = Room::new(RoomId(1), Bounds::new(12, 7, 12, 7), Coord::new(12, 7));
    for s in 1..=16 {
        let scale = Scale::new(s).unwrap();
        assert_eq!(room_center_to_pixel(&room, scale), point_to_pixel(room.center, scale));
    }
}

#[test]
fn test_every_kind_reachable_from_table() {
    let mut seen = BTreeSet::new();
    for face in 1..=25 {
        seen.insert(RoomKind::for_roll(face));
    }
    assert_eq!(seen.len(), RoomKind::iter().count());
}

/// Take `steps` moves, choosing connections from `choices`, and check
/// the progression invariants after each one.
fn walk(map: &DungeonMap, choices: &[usize], dice_seed: u64) -> GameState {
    let mut state = GameState::new();
    let mut dice = GameRng::new(dice_seed);
    for &choice in choices {
        let before = state.clone();
        let available = state.current_room(map).connections.len();
        match state.move_through(map, choice, &mut dice) {
            Ok(_) => {
                assert!(choice < available);
                assert!(before.visited.is_subset(&state.visited));
            }
            Err(MoveError::ConnectionOutOfRange { index, available: n }) => {
                assert_eq!(index, choice);
                assert_eq!(n, available);
                assert_eq!(state, before);
            }
        }
        assert!(state.visited.contains(&state.current_room));
        assert!(state.visited.contains(&RoomId::START));
        assert!(state.kind_of(RoomId::START).is_none());
    }
    state
}

fn check_kind_limits(state: &GameState) {
    let mut counts: HashMap<RoomKind, usize> = HashMap::new();
    for kind in state.kinds.values() {
        *counts.entry(*kind).or_default() += 1;
    }
    for (kind, n) in counts {
        if let Some(max) = kind.max_rooms() {
            assert!(n <= max, "{kind} in {n} rooms");
        }
        if kind.policy() != KindPolicy::Unbounded {
            let faces = state.history.values(kind).unwrap();
            assert_eq!(faces.len(), n);
            let distinct: BTreeSet<_> = faces.iter().collect();
            assert_eq!(distinct.len(), faces.len());
            assert!(faces.iter().all(|f| kind.faces().contains(f)));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_build_is_deterministic(seed in any::<u64>()) {
        prop_assert_eq!(build(seed), build(seed));
    }

    #[test]
    fn prop_every_door_has_two_owners(seed in any::<u64>()) {
        let map = build(seed);
        let mut owners: HashMap<Coord, BTreeSet<RoomId>> = HashMap::new();
        for room in map.rooms() {
            let indices: Vec<usize> = room.connections.iter().map(|c| c.local_index).collect();
            prop_assert_eq!(indices, (0..room.connections.len()).collect::<Vec<_>>());
            for conn in &room.connections {
                owners.entry(conn.door).or_default().insert(room.id);
            }
        }
        prop_assert_eq!(owners.len(), map.doors().len());
        for ids in owners.values() {
            prop_assert_eq!(ids.len(), 2);
        }
    }

    #[test]
    fn prop_progression_invariants(
        seed in 0u64..10_000,
        dice_seed in any::<u64>(),
        choices in proptest::collection::vec(0usize..6, 1..120),
    ) {
        let map = build(seed);
        let state = walk(&map, &choices, dice_seed);
        check_kind_limits(&state);
    }

    #[test]
    fn prop_long_walks_respect_kind_limits(seed in 0u64..500, dice_seed in any::<u64>()) {
        let map = build(seed);
        let mut state = GameState::new();
        let mut rng = GameRng::new(dice_seed);
        let mut dice = GameRng::new(dice_seed ^ 0x5eed);
        for _ in 0..400 {
            let n = state.current_room(&map).connections.len() as u32;
            if n == 0 {
                break;
            }
            let pick = rng.rn2(n) as usize;
            state.move_through(&map, pick, &mut dice).unwrap();
        }
        check_kind_limits(&state);
    }

    #[test]
    fn prop_state_json_round_trip(
        seed in 0u64..1_000,
        choices in proptest::collection::vec(0usize..4, 0..40),
    ) {
        let map = build(seed);
        let state = walk(&map, &choices, seed);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.current_room, state.current_room);
        prop_assert_eq!(&back.visited, &state.visited);
        prop_assert_eq!(&back.history, &state.history);
        prop_assert_eq!(back, state);
    }
}
