use image::{Rgb, RgbImage};

use crate::overlay::domain::label_renderer::LabelRenderer;

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

/// Rows of a 3x5 glyph, top to bottom; bit 2 is the leftmost column.
type Glyph = [u8; 5];

const BLOCK: Glyph = [0b111, 0b111, 0b111, 0b111, 0b111];

/// Built-in pixel font used when no TrueType font can be loaded.
///
/// Covers ASCII letters (case-folded), digits and common punctuation. Any
/// other character is drawn as a solid block so its position stays visible.
pub struct BitmapLabelRenderer {
    scale: u32,
}

impl BitmapLabelRenderer {
    /// Scale chosen so the glyph height approximates `size` pixels.
    pub fn for_size(size: f32) -> Self {
        let scale = (size / GLYPH_HEIGHT as f32).round().max(1.0) as u32;
        Self { scale }
    }

    /// Horizontal advance per character, including one column of spacing.
    fn advance(&self) -> u32 {
        (GLYPH_WIDTH + 1) * self.scale
    }

    fn draw_glyph(&self, canvas: &mut RgbImage, x: i64, y: i64, glyph: &Glyph, color: Rgb<u8>) {
        let (w, h) = (canvas.width() as i64, canvas.height() as i64);
        let s = self.scale as i64;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let px = x + col as i64 * s;
                let py = y + row as i64 * s;
                for dy in 0..s {
                    for dx in 0..s {
                        let (cx, cy) = (px + dx, py + dy);
                        if cx >= 0 && cy >= 0 && cx < w && cy < h {
                            canvas.put_pixel(cx as u32, cy as u32, color);
                        }
                    }
                }
            }
        }
    }
}

impl LabelRenderer for BitmapLabelRenderer {
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let mut cursor = x as i64;
        for ch in text.chars() {
            if let Some(glyph) = glyph_for(ch) {
                self.draw_glyph(canvas, cursor, y as i64, &glyph, color);
            }
            cursor += self.advance() as i64;
        }
    }

    fn name(&self) -> &'static str {
        "bitmap"
    }
}

/// `None` for whitespace, which advances without drawing.
fn glyph_for(ch: char) -> Option<Glyph> {
    if ch.is_whitespace() {
        return None;
    }
    let glyph = match ch.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b110, 0b001, 0b010, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        _ => BLOCK,
    };
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    fn lit(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|p| p.0 == RED.0).count()
    }

    #[test]
    fn test_scale_tracks_requested_size() {
        assert_eq!(BitmapLabelRenderer::for_size(15.0).scale, 3);
        assert_eq!(BitmapLabelRenderer::for_size(1.0).scale, 1);
    }

    #[test]
    fn test_draws_glyph_pixels_at_scale() {
        let renderer = BitmapLabelRenderer::for_size(5.0);
        let mut canvas = RgbImage::new(10, 10);
        renderer.draw(&mut canvas, 0, 0, "T", RED);
        // T: full top row, then a centre column.
        assert_eq!(canvas.get_pixel(0, 0).0, RED.0);
        assert_eq!(canvas.get_pixel(2, 0).0, RED.0);
        assert_eq!(canvas.get_pixel(1, 4).0, RED.0);
        assert_eq!(canvas.get_pixel(0, 4).0, [0, 0, 0]);
        assert_eq!(lit(&canvas), 7);
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        let renderer = BitmapLabelRenderer::for_size(10.0);
        let mut lower = RgbImage::new(40, 20);
        let mut upper = RgbImage::new(40, 20);
        renderer.draw(&mut lower, 1, 1, "obj", RED);
        renderer.draw(&mut upper, 1, 1, "OBJ", RED);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_whitespace_advances_without_drawing() {
        let renderer = BitmapLabelRenderer::for_size(5.0);
        let mut canvas = RgbImage::new(20, 6);
        renderer.draw(&mut canvas, 0, 0, " a", RED);
        // 'a' starts after one advance of 4 columns.
        assert!((0..4).all(|x| (0..5).all(|y| canvas.get_pixel(x, y).0 == [0, 0, 0])));
        assert!(lit(&canvas) > 0);
    }

    #[test]
    fn test_unknown_character_draws_block() {
        let renderer = BitmapLabelRenderer::for_size(5.0);
        let mut canvas = RgbImage::new(5, 6);
        renderer.draw(&mut canvas, 0, 0, "é", RED);
        assert_eq!(lit(&canvas), 15);
    }

    #[test]
    fn test_offscreen_text_is_clipped() {
        let renderer = BitmapLabelRenderer::for_size(15.0);
        let mut canvas = RgbImage::new(20, 20);
        renderer.draw(&mut canvas, -100, -100, "hidden", RED);
        renderer.draw(&mut canvas, 15, 15, "edge", RED);
        renderer.draw(&mut canvas, i32::MAX - 1, i32::MIN + 1, "far", RED);
        assert!(lit(&canvas) > 0);
        assert!(canvas.get_pixel(0, 0).0 == [0, 0, 0]);
    }
}
