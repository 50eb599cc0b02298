//! dw-core: Core game logic for the doorway dungeon crawler
//!
//! This crate contains all game logic with no file or image I/O.
//! Rendering and persistence are collaborators that plug in through
//! [`MapRenderer`] and [`SessionSnapshot`].

pub mod dungeon;
pub mod geometry;
pub mod kind;
pub mod session;
pub mod state;
pub mod store;

mod consts;
mod rng;

pub use consts::*;
pub use dungeon::{DungeonMap, Room, RoomConnection, RoomId, TopologyError};
pub use geometry::{Coord, PixelPoint, Scale, point_to_pixel, room_center_to_pixel};
pub use kind::{Dice, KindHistory, KindPolicy, RoomKind};
pub use rng::GameRng;
pub use session::{
    MapRenderer, RenderFailure, RoomReport, Session, SessionError, SessionOptions, SessionSnapshot,
};
pub use state::{GameState, MoveError};
pub use store::{SessionId, SessionStore};
