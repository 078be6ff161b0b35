use image::{Rgb, RgbImage};

/// How far outside the canvas a label anchor may be and still be drawn.
/// Keeps glyph arithmetic far from `i32` limits.
pub const LABEL_REACH: i64 = 1 << 14;

/// Draws a text label onto a canvas.
///
/// `(x, y)` is the top-left corner of the text. Implementations clip to the
/// canvas and never fail; off-canvas text is simply not drawn.
pub trait LabelRenderer: Send + Sync {
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>);

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Whether a label anchored at `(x, y)` is within [`LABEL_REACH`] of the canvas.
pub fn anchor_in_reach(canvas: &RgbImage, x: i32, y: i32) -> bool {
    let (w, h) = canvas.dimensions();
    let near = |v: i32, extent: u32| {
        let v = v as i64;
        v >= -LABEL_REACH && v <= extent as i64 + LABEL_REACH
    };
    near(x, w) && near(y, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_in_reach() {
        let canvas = RgbImage::new(100, 50);
        assert!(anchor_in_reach(&canvas, 0, 0));
        assert!(anchor_in_reach(&canvas, -100, 60));
        assert!(anchor_in_reach(&canvas, 100 + LABEL_REACH as i32, 50));
        assert!(!anchor_in_reach(&canvas, i32::MAX, 10));
        assert!(!anchor_in_reach(&canvas, 10, i32::MIN));
        assert!(!anchor_in_reach(&canvas, -(LABEL_REACH as i32) - 1, 10));
    }
}
