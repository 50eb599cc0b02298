//! Grid geometry and coordinate scaling
//!
//! The dungeon lives on an integer grid. Rendering scales every cell to an
//! `S×S` pixel block, and labels are anchored at the midpoints computed here.
//! Everything is integer arithmetic; results are exact pixel coordinates.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_SCALE;
use crate::dungeon::Room;

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

impl Coord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Inclusive bounding box of a room interior, in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in cells
    pub const fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Height in cells
    pub const fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Check if a cell lies inside the box
    pub const fn contains(&self, c: Coord) -> bool {
        self.left <= c.x && c.x <= self.right && self.top <= c.y && c.y <= self.bottom
    }

    /// Midpoint of the whole scaled extent, floored
    pub const fn scaled_center(&self, scale: Scale) -> PixelPoint {
        let s = scale.get();
        // First and last pixel of the scaled span are left*s and (right+1)*s - 1.
        PixelPoint {
            x: (self.left * s + (self.right + 1) * s - 1) / 2,
            y: (self.top * s + (self.bottom + 1) * s - 1) / 2,
        }
    }
}

/// Integer scale factor, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Scale(NonZeroU32);

impl Scale {
    /// Returns `None` for a zero factor
    pub const fn new(factor: u32) -> Option<Self> {
        match NonZeroU32::new(factor) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self(NonZeroU32::MIN.saturating_add(DEFAULT_SCALE - 1))
    }
}

impl TryFrom<u32> for Scale {
    type Error = &'static str;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("scale factor must be at least 1")
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> Self {
        scale.get()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// A pixel position in a scaled image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

/// Floored midpoint of the `S×S` pixel block covering `cell`
pub const fn point_to_pixel(cell: Coord, scale: Scale) -> PixelPoint {
    Bounds::new(cell.x, cell.y, cell.x, cell.y).scaled_center(scale)
}

/// Floored midpoint of the room's full scaled bounding box
///
/// Rooms with an even width or height have no single centre cell, so this is
/// computed from the scaled extent rather than by scaling `room.center`.
pub const fn room_center_to_pixel(room: &Room, scale: Scale) -> PixelPoint {
    room.bounds.scaled_center(scale)
}
