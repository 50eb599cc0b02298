//! Map cell types for the digging generator

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::geometry::Coord;

/// Cell/terrain type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    /// Undug rock
    #[default]
    Stone = 0,
    /// Wall ring of at least one room
    Wall = 1,
    /// Room interior
    Floor = 2,
    /// Wall cell shared by two rooms and opened between them
    Door = 3,
}

impl CellType {
    /// Check if this cell has been opened up
    pub const fn is_dug(&self) -> bool {
        matches!(self, CellType::Floor | CellType::Door)
    }

    /// Check if a new room may put its wall ring here
    pub const fn accepts_wall(&self) -> bool {
        matches!(self, CellType::Stone | CellType::Wall)
    }
}

/// Column-major cell grid, indexed `cells[x][y]`
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Vec<CellType>>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![CellType::Stone; height as usize]; width as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell at signed coordinates, `None` outside the map
    pub fn get(&self, x: i64, y: i64) -> Option<CellType> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells.get(x as usize)?.get(y as usize).copied()
    }

    pub fn set(&mut self, c: Coord, typ: CellType) {
        if let Some(cell) = self
            .cells
            .get_mut(c.x as usize)
            .and_then(|col| col.get_mut(c.y as usize))
        {
            *cell = typ;
        }
    }

    /// Number of floor and door cells
    pub fn dug_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.is_dug())
            .count()
    }

    /// Area of the map in cells
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
