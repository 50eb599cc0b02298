//! Tiny 3×5 bitmap font for map labels
//!
//! Covers digits and the room glyphs. Each glyph is five rows of three bits,
//! most significant bit on the left.

use image::{Rgba, RgbaImage};

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;

/// Row bitmaps for a character, `None` if the font lacks it
pub const fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '$' => [0b011, 0b110, 0b010, 0b011, 0b110],
        _ => return None,
    };
    Some(rows)
}

/// Pixel size of `text` at magnification `mag`
pub fn text_size(text: &str, mag: u32) -> (u32, u32) {
    let n = text.chars().count() as u32;
    if n == 0 {
        return (0, 0);
    }
    let w = n * GLYPH_WIDTH * mag + (n - 1) * mag;
    (w, GLYPH_HEIGHT * mag)
}

/// Draw `text` with its box centred on (`cx`, `cy`), clipped to the canvas
pub fn draw_text_centered(
    canvas: &mut RgbaImage,
    text: &str,
    cx: u32,
    cy: u32,
    mag: u32,
    color: Rgba<u8>,
) {
    let mag = mag.max(1);
    let (w, h) = text_size(text, mag);
    let left = i64::from(cx) - i64::from(w / 2);
    let top = i64::from(cy) - i64::from(h / 2);

    let advance = i64::from((GLYPH_WIDTH + 1) * mag);
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let gx = left + i as i64 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x0 = gx + i64::from(col * mag);
                let y0 = top + row as i64 * i64::from(mag);
                fill_block(canvas, x0, y0, mag, color);
            }
        }
    }
}

/// Fill a `size×size` block, skipping pixels off the canvas
fn fill_block(canvas: &mut RgbaImage, x: i64, y: i64, size: u32, color: Rgba<u8>) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for dy in 0..i64::from(size) {
        for dx in 0..i64::from(size) {
            let (px, py) = (x + dx, y + dy);
            if (0..cw).contains(&px) && (0..ch).contains(&py) {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_digits_and_room_glyphs_exist() {
        for c in "0123456789SCDFHLRTWZ$".chars() {
            assert!(glyph(c).is_some(), "missing {c}");
        }
        assert!(glyph('?').is_none());
    }

    #[test]
    fn test_text_size() {
        assert_eq!(text_size("", 2), (0, 0));
        assert_eq!(text_size("7", 1), (3, 5));
        assert_eq!(text_size("12", 2), (14, 10));
    }

    #[test]
    fn test_draw_one() {
        let mut canvas = RgbaImage::from_pixel(9, 9, BLACK);
        draw_text_centered(&mut canvas, "1", 4, 4, 1, WHITE);
        // Glyph box spans x 3..=5, y 2..=6; the stem of "1" is column 4.
        for y in 2..=6 {
            assert_eq!(*canvas.get_pixel(4, y), WHITE);
        }
        assert_eq!(*canvas.get_pixel(3, 2), BLACK);
        assert_eq!(*canvas.get_pixel(3, 3), WHITE);
        assert_eq!(*canvas.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn test_draw_clips_at_edges() {
        let mut canvas = RgbaImage::from_pixel(4, 4, BLACK);
        // Box starts at (-10, -7); only the second glyph reaches the canvas.
        draw_text_centered(&mut canvas, "88", 0, 0, 3, WHITE);
        assert_eq!(*canvas.get_pixel(0, 0), BLACK);
        assert_eq!(*canvas.get_pixel(2, 0), WHITE);
        assert_eq!(*canvas.get_pixel(3, 0), WHITE);
    }
}
