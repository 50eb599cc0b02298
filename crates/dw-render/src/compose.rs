//! Map image composition
//!
//! The grid is painted at one pixel per cell, scaled up with
//! nearest-neighbour sampling, and then labelled at full resolution.

use dw_core::geometry::Coord;
use dw_core::{DungeonMap, GameState, Scale, point_to_pixel, room_center_to_pixel};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::debug;

use crate::font::draw_text_centered;
use crate::palette;

/// Label for the entry room
const START_LABEL: &str = "S";

/// One pixel per grid cell
pub fn paint_grid(map: &DungeonMap, state: &GameState) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(map.width(), map.height(), palette::BACKGROUND);

    for y in 0..map.height() {
        for x in 0..map.width() {
            let Some(room) = map.room_at(Coord::new(x, y)) else {
                continue;
            };
            if room.id == state.current_room {
                canvas.put_pixel(x, y, palette::CURRENT_ROOM);
            } else if state.is_visited(room.id) {
                canvas.put_pixel(x, y, palette::VISITED_ROOM);
            }
        }
    }

    // Doors go on top of the rooms.
    for room in map.rooms().iter().filter(|r| state.is_visited(r.id)) {
        for conn in &room.connections {
            if conn.door.x < canvas.width() && conn.door.y < canvas.height() {
                canvas.put_pixel(conn.door.x, conn.door.y, palette::DOOR);
            }
        }
    }

    canvas
}

/// Scale by an integer factor with nearest-neighbour sampling
pub fn upscale(image: &RgbaImage, scale: Scale) -> RgbaImage {
    let s = scale.get();
    imageops::resize(image, image.width() * s, image.height() * s, FilterType::Nearest)
}

/// Label magnification for a scale factor
fn label_mag(scale: Scale) -> u32 {
    (scale.get() / 5).max(1)
}

/// Room glyphs for visited rooms and exit numbers for the current room
pub fn draw_labels(canvas: &mut RgbaImage, map: &DungeonMap, state: &GameState, scale: Scale) {
    let mag = label_mag(scale);

    for room in map.rooms().iter().filter(|r| state.is_visited(r.id)) {
        let label = if room.id.is_start() {
            START_LABEL.to_string()
        } else {
            match state.kind_of(room.id).and_then(|k| k.glyph()) {
                Some(glyph) => glyph.to_string(),
                None => continue,
            }
        };
        let at = room_center_to_pixel(room, scale);
        draw_text_centered(canvas, &label, at.x, at.y, mag, palette::LABEL);
    }

    for conn in &state.current_room(map).connections {
        let at = point_to_pixel(conn.door, scale);
        draw_text_centered(
            canvas,
            &conn.local_index.to_string(),
            at.x + 1,
            at.y + 1,
            mag,
            palette::LABEL,
        );
    }
}

/// Full map frame: painted, scaled and labelled
pub fn compose_map_image(map: &DungeonMap, state: &GameState, scale: Scale) -> RgbaImage {
    let mut canvas = upscale(&paint_grid(map, state), scale);
    draw_labels(&mut canvas, map, state, scale);
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        current = %state.current_room,
        "map composed"
    );
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use dw_core::dungeon::{RawDungeon, RawRoom, RoomId};
    use dw_core::geometry::Bounds;
    use dw_core::{Dice, RoomKind};

    struct Fixed(u32);

    impl Dice for Fixed {
        fn roll(&mut self, _sides: u32) -> u32 {
            self.0
        }
    }

    /// Room 0 at x 2..=4 and room 1 at x 6..=8, door at (5, 3)
    fn pair() -> DungeonMap {
        let room = |l: u32, r: u32| RawRoom {
            bounds: Bounds::new(l, 2, r, 4),
            center: Coord::new((l + r + 1) / 2, 3),
            doors: vec![Coord::new(5, 3)],
        };
        DungeonMap::from_raw(RawDungeon {
            width: 11,
            height: 7,
            rooms: vec![room(2, 4), room(6, 8)],
        })
        .unwrap()
    }

    #[test]
    fn test_paint_grid_colours() {
        let map = pair();
        let state = GameState::new();
        let img = paint_grid(&map, &state);
        assert_eq!(img.dimensions(), (11, 7));
        assert_eq!(*img.get_pixel(3, 3), palette::CURRENT_ROOM);
        assert_eq!(*img.get_pixel(5, 3), palette::DOOR);
        assert_eq!(*img.get_pixel(7, 3), palette::BACKGROUND);
        assert_eq!(*img.get_pixel(0, 0), palette::BACKGROUND);
    }

    #[test]
    fn test_paint_grid_after_move() {
        let map = pair();
        let mut state = GameState::new();
        state.move_through(&map, 0, &mut Fixed(20)).unwrap();
        let img = paint_grid(&map, &state);
        assert_eq!(*img.get_pixel(3, 3), palette::VISITED_ROOM);
        assert_eq!(*img.get_pixel(7, 3), palette::CURRENT_ROOM);
        assert_eq!(*img.get_pixel(5, 3), palette::DOOR);
    }

    #[test]
    fn test_upscale_nearest() {
        let map = pair();
        let img = paint_grid(&map, &GameState::new());
        let big = upscale(&img, Scale::new(4).unwrap());
        assert_eq!(big.dimensions(), (44, 28));
        // Every pixel of the door block keeps the door colour.
        for y in 12..16 {
            for x in 20..24 {
                assert_eq!(*big.get_pixel(x, y), palette::DOOR);
            }
        }
        assert_eq!(*big.get_pixel(19, 12), palette::CURRENT_ROOM);
        assert_eq!(*big.get_pixel(24, 12), palette::BACKGROUND);
    }

    #[test]
    fn test_labels_are_drawn() {
        let map = pair();
        let mut state = GameState::new();
        state.move_through(&map, 0, &mut Fixed(9)).unwrap();
        assert_eq!(state.kind_of(RoomId(1)), Some(RoomKind::Forest));

        let scale = Scale::new(10).unwrap();
        let img = compose_map_image(&map, &state, scale);
        assert_eq!(img.dimensions(), (110, 70));
        let labelled = img.pixels().filter(|p| **p == palette::LABEL).count();
        assert!(labelled > 0);

        // Top-left pixel of the "F" glyph sits in room 1's block.
        let at = room_center_to_pixel(map.room(RoomId(1)).unwrap(), scale);
        assert_eq!(*img.get_pixel(at.x - 3, at.y - 5), palette::LABEL);
    }

    #[test]
    fn test_label_mag() {
        assert_eq!(label_mag(Scale::new(1).unwrap()), 1);
        assert_eq!(label_mag(Scale::new(10).unwrap()), 2);
        assert_eq!(label_mag(Scale::new(16).unwrap()), 3);
    }
}
