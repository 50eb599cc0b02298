//! Game sessions
//!
//! A session owns one dungeon, its progress and the last rendered frame.
//! Command handlers drive it through [`Session::show_map`] and
//! [`Session::move_to`]; both re-render through a [`MapRenderer`].

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::dungeon::{DungeonMap, Room, RoomId, TopologyError};
use crate::geometry::Scale;
use crate::rng::GameRng;
use crate::state::{GameState, MoveError};
use crate::{DEFAULT_HEIGHT, DEFAULT_SEED, DEFAULT_WIDTH};

/// Opaque failure reported by a rendering collaborator
pub type RenderFailure = Box<dyn std::error::Error + Send + Sync>;

/// Turns a map and its progress into encoded image bytes
pub trait MapRenderer {
    fn render(
        &self,
        map: &DungeonMap,
        state: &GameState,
        scale: Scale,
    ) -> Result<Vec<u8>, RenderFailure>;
}

/// Session-level failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to build dungeon: {0}")]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("failed to render map: {0}")]
    Render(#[source] RenderFailure),

    #[error("no session named {0:?}")]
    UnknownSession(String),

    #[error("inconsistent snapshot: {0}")]
    Snapshot(String),
}

/// Parameters fixed at session creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub width: u32,
    pub height: u32,
    /// Map seed
    pub seed: u64,
    /// Pixels per grid cell in rendered frames
    pub scale: Scale,
    /// Seed for room-kind dice. `None` draws from entropy, so two sessions
    /// on the same map seed can still disagree about room contents.
    pub dice_seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: DEFAULT_SEED,
            scale: Scale::default(),
            dice_seed: None,
        }
    }
}

impl SessionOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_dice_seed(mut self, seed: u64) -> Self {
        self.dice_seed = Some(seed);
        self
    }

    /// Seed handed to the generator; 0 means "no seed" and falls back to the default
    pub const fn map_seed(&self) -> u64 {
        if self.seed == 0 { DEFAULT_SEED } else { self.seed }
    }
}

/// What the command layer tells the player after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomReport {
    pub room: RoomId,
    pub name: String,
    /// Local indices the player may move through
    pub connections: Vec<usize>,
    /// `true` after a move, `false` for a plain map request
    pub entered: bool,
}

impl fmt::Display for RoomReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exits = self
            .connections
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if self.entered {
            write!(f, "You've entered {} room. ", self.name)?;
        } else {
            write!(f, "You are now in {} room. ", self.name)?;
        }
        write!(f, "From here, you can move to {exits}.")
    }
}

/// Persistable part of a session
///
/// The room graph is not stored; it is rebuilt from the seed on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub scale: Scale,
    pub state: GameState,
}

/// One running game
#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    map: DungeonMap,
    state: GameState,
    dice: GameRng,
    frame: Vec<u8>,
}

impl Session {
    /// Build the dungeon and start in the entry room
    pub fn new(options: SessionOptions) -> Result<Self, SessionError> {
        let map = DungeonMap::build(options.width, options.height, options.map_seed())?;
        debug!(seed = options.map_seed(), rooms = map.room_count(), "session created");
        Ok(Self::from_parts(options, map, GameState::new()))
    }

    fn from_parts(options: SessionOptions, map: DungeonMap, state: GameState) -> Self {
        let dice = options
            .dice_seed
            .map_or_else(GameRng::from_entropy, GameRng::new);
        // Entropy dice seeds are only recoverable from this event.
        debug!(dice_seed = dice.seed(), "kind dice ready");
        Self {
            options,
            map,
            state,
            dice,
            frame: Vec::new(),
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn map(&self) -> &DungeonMap {
        &self.map
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scale(&self) -> Scale {
        self.options.scale
    }

    /// Last rendered frame, empty until the first render
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn current_room(&self) -> &Room {
        self.state.current_room(&self.map)
    }

    /// Report for the current room
    pub fn report(&self, entered: bool) -> RoomReport {
        let room = self.current_room();
        RoomReport {
            room: room.id,
            name: self.state.room_name(room.id),
            connections: room.connection_indices(),
            entered,
        }
    }

    /// Re-render and cache the frame
    pub fn render<R: MapRenderer + ?Sized>(&mut self, renderer: &R) -> Result<&[u8], SessionError> {
        self.frame = renderer
            .render(&self.map, &self.state, self.options.scale)
            .map_err(SessionError::Render)?;
        Ok(&self.frame)
    }

    /// Show the current room without changing progress
    pub fn show_map<R: MapRenderer + ?Sized>(
        &mut self,
        renderer: &R,
    ) -> Result<RoomReport, SessionError> {
        self.render(renderer)?;
        Ok(self.report(false))
    }

    /// Move through a connection of the current room
    pub fn move_to<R: MapRenderer + ?Sized>(
        &mut self,
        local_index: usize,
        renderer: &R,
    ) -> Result<RoomReport, SessionError> {
        self.state
            .move_through(&self.map, local_index, &mut self.dice)?;
        self.render(renderer)?;
        Ok(self.report(true))
    }

    /// Debugging aid: mark every room visited
    pub fn reveal_all(&mut self) {
        self.state.reveal_all(&self.map);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            width: self.options.width,
            height: self.options.height,
            seed: self.options.seed,
            scale: self.options.scale,
            state: self.state.clone(),
        }
    }

    /// Rebuild a session from a snapshot
    pub fn restore(snapshot: SessionSnapshot, dice_seed: Option<u64>) -> Result<Self, SessionError> {
        let options = SessionOptions {
            width: snapshot.width,
            height: snapshot.height,
            seed: snapshot.seed,
            scale: snapshot.scale,
            dice_seed,
        };
        let map = DungeonMap::build(options.width, options.height, options.map_seed())?;
        check_state(&map, &snapshot.state)?;
        debug!(
            seed = options.seed,
            visited = snapshot.state.visited.len(),
            "session restored"
        );
        Ok(Self::from_parts(options, map, snapshot.state))
    }
}

/// State must only reference rooms of `map` and keep its invariants
fn check_state(map: &DungeonMap, state: &GameState) -> Result<(), SessionError> {
    let bad = |msg: String| Err(SessionError::Snapshot(msg));

    if let Some(id) = state
        .visited
        .iter()
        .chain(state.kinds.keys())
        .chain(core::iter::once(&state.current_room))
        .find(|id| !map.contains_room(**id))
    {
        return bad(format!("room {id} does not exist on a {}-room map", map.room_count()));
    }
    if !state.visited.contains(&RoomId::START) {
        return bad("entry room is not visited".to_string());
    }
    if !state.visited.contains(&state.current_room) {
        return bad(format!("current room {} is not visited", state.current_room));
    }
    if state.kinds.contains_key(&RoomId::START) {
        return bad("entry room has a kind".to_string());
    }
    Ok(())
}
