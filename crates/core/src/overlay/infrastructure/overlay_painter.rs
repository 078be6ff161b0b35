use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::overlay::domain::label_renderer::{anchor_in_reach, LabelRenderer};
use crate::shared::constants::{
    BOX_ACCENT, DEFAULT_LABEL_OFFSET, DEFAULT_LABEL_SIZE, DEFAULT_MARKER_RADIUS,
    DEFAULT_OUTLINE_WIDTH, POINT_ACCENT,
};
use crate::shared::region::{box_outline, point_center, NormalizedBox, NormalizedPoint};

/// Sizes and colors of overlay graphics.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayStyle {
    pub outline_width: u32,
    pub label_offset: i32,
    pub label_size: f32,
    pub marker_radius: i32,
    pub box_color: [u8; 3],
    pub point_color: [u8; 3],
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            outline_width: DEFAULT_OUTLINE_WIDTH,
            label_offset: DEFAULT_LABEL_OFFSET,
            label_size: DEFAULT_LABEL_SIZE,
            marker_radius: DEFAULT_MARKER_RADIUS,
            box_color: BOX_ACCENT,
            point_color: POINT_ACCENT,
        }
    }
}

/// Draws detection outlines/labels and pointing markers.
///
/// Geometry is taken from the unclamped box or point position; anything
/// falling off the canvas is clipped.
pub struct OverlayPainter {
    label_renderer: Box<dyn LabelRenderer>,
    style: OverlayStyle,
}

impl OverlayPainter {
    pub fn new(label_renderer: Box<dyn LabelRenderer>, style: OverlayStyle) -> Self {
        Self {
            label_renderer,
            style,
        }
    }

    pub fn label_renderer_name(&self) -> &'static str {
        self.label_renderer.name()
    }

    /// Outline plus label above the top-left corner.
    ///
    /// The outline covers the inclusive rectangle and grows inward by
    /// `outline_width`. Inverted boxes get no outline but keep their label.
    /// Labels anchored far off the canvas are skipped.
    pub fn draw_box(&self, canvas: &mut RgbImage, b: &NormalizedBox) {
        let (w, h) = canvas.dimensions();
        let (left, top, right, bottom) = box_outline(b, w, h);
        let color = Rgb(self.style.box_color);

        let margin = self.style.outline_width as i64 + 1;
        let clamp_x = |v: i32| (v as i64).clamp(-margin, w as i64 + margin);
        let clamp_y = |v: i32| (v as i64).clamp(-margin, h as i64 + margin);
        let (l, t, r, btm) = (clamp_x(left), clamp_y(top), clamp_x(right), clamp_y(bottom));

        for inset in 0..self.style.outline_width as i64 {
            let rect_w = r - l + 1 - 2 * inset;
            let rect_h = btm - t + 1 - 2 * inset;
            if rect_w <= 0 || rect_h <= 0 {
                break;
            }
            let rect = Rect::at((l + inset) as i32, (t + inset) as i32)
                .of_size(rect_w as u32, rect_h as u32);
            draw_hollow_rect_mut(canvas, rect, color);
        }

        let label_y = top.saturating_sub(self.style.label_offset);
        if anchor_in_reach(canvas, left, label_y) {
            self.label_renderer.draw(canvas, left, label_y, &b.label, color);
        }
    }

    /// Filled circle centered on the point. Markers that cannot touch the
    /// canvas are skipped.
    pub fn draw_point(&self, canvas: &mut RgbImage, p: &NormalizedPoint) {
        let (w, h) = canvas.dimensions();
        let (cx, cy) = point_center(p, w, h);
        let radius = self.style.marker_radius.max(0);
        let reach = radius as i64;
        if !within(cx, w, reach) || !within(cy, h, reach) {
            log::debug!("Skipping off-canvas point marker at ({cx}, {cy})");
            return;
        }
        draw_filled_circle_mut(canvas, (cx, cy), radius, Rgb(self.style.point_color));
    }
}

/// Whether `v` lies in `[-reach, extent + reach]`.
fn within(v: i32, extent: u32, reach: i64) -> bool {
    let v = v as i64;
    v >= -reach && v <= extent as i64 + reach
}
