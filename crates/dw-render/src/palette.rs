//! Map colours

use image::Rgba;

/// Rock, walls and rooms not yet entered
pub const BACKGROUND: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Room the party stands in
pub const CURRENT_ROOM: Rgba<u8> = Rgba([10, 150, 150, 255]);

/// Rooms entered before
pub const VISITED_ROOM: Rgba<u8> = Rgba([10, 10, 10, 255]);

/// Doors of entered rooms
pub const DOOR: Rgba<u8> = Rgba([200, 10, 10, 255]);

/// Text labels
pub const LABEL: Rgba<u8> = Rgba([255, 255, 255, 255]);
