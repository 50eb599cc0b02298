//! dw-render: Map image composition
//!
//! Paints the dungeon grid, highlights doors, labels rooms and exits, scales
//! the result with nearest-neighbour sampling and encodes it as PNG.

pub mod codec;
pub mod compose;
pub mod font;
pub mod palette;

use dw_core::{DungeonMap, GameState, MapRenderer, RenderFailure, Scale};
use thiserror::Error;

pub use codec::{decode_png, encode_png, write_png};
pub use compose::{compose_map_image, draw_labels, paint_grid, upscale};

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders sessions as PNG bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct PngRenderer;

impl MapRenderer for PngRenderer {
    fn render(
        &self,
        map: &DungeonMap,
        state: &GameState,
        scale: Scale,
    ) -> Result<Vec<u8>, RenderFailure> {
        let image = compose_map_image(map, state, scale);
        Ok(encode_png(&image)?)
    }
}
