//! Core game constants

/// Default map dimensions, in grid cells
pub const DEFAULT_WIDTH: u32 = 70;
pub const DEFAULT_HEIGHT: u32 = 40;

/// Map seed used when a session is created without one
pub const DEFAULT_SEED: u64 = 1234;

/// Default pixels per grid cell for rendered maps
pub const DEFAULT_SCALE: u32 = 10;

/// Sides of the room-kind die
pub const KIND_DIE_SIDES: u32 = 25;

/// Display name of the entry room
pub const START_ROOM_NAME: &str = "Start";

/// Display name of a room that has not been entered yet
pub const UNKNOWN_ROOM_NAME: &str = "Unknown";
