use serde::{Deserialize, Serialize};

const DEFAULT_LABEL: &str = "object";

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

/// A detected object box in normalized (0–1) coordinates.
///
/// Ordering of the min/max fields is not guaranteed by the model and is
/// passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    #[serde(default)]
    pub x_min: f64,
    #[serde(default)]
    pub y_min: f64,
    #[serde(default)]
    pub x_max: f64,
    #[serde(default)]
    pub y_max: f64,
    #[serde(default = "default_label")]
    pub label: String,
}

impl NormalizedBox {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64, label: impl Into<String>) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
            label: label.into(),
        }
    }
}

/// A pointed location in normalized (0–1) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle, `right`/`bottom` exclusive.
///
/// Inverted rectangles (`right < left`) are representable and have zero area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRegion {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelRegion {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersects with `[0, width] x [0, height]`.
    pub fn clip_to(&self, width: u32, height: u32) -> PixelRegion {
        PixelRegion {
            left: self.left.min(width),
            top: self.top.min(height),
            right: self.right.min(width),
            bottom: self.bottom.min(height),
        }
    }

    pub(crate) fn bounds_usize(&self) -> (usize, usize, usize, usize) {
        (
            self.left as usize,
            self.top as usize,
            self.right as usize,
            self.bottom as usize,
        )
    }
}

/// A region of interest as returned by the model.
#[derive(Clone, Debug, PartialEq)]
pub enum DisclosureRegion {
    Box(NormalizedBox),
    Point(NormalizedPoint),
}

impl DisclosureRegion {
    /// Pixel rectangle to disclose for this region in a `width x height` image.
    pub fn pixel_region(&self, width: u32, height: u32, point_radius: u32) -> PixelRegion {
        match self {
            DisclosureRegion::Box(b) => to_box_region(b, width, height),
            DisclosureRegion::Point(p) => to_point_region(p, width, height, point_radius),
        }
    }
}

impl From<NormalizedBox> for DisclosureRegion {
    fn from(b: NormalizedBox) -> Self {
        DisclosureRegion::Box(b)
    }
}

impl From<NormalizedPoint> for DisclosureRegion {
    fn from(p: NormalizedPoint) -> Self {
        DisclosureRegion::Point(p)
    }
}

/// Maps a normalized box to pixel space, clamped to the image.
///
/// Each coordinate is scaled, truncated toward zero, then clamped. Min/max
/// are not reordered, so an inverted box yields an empty region.
pub fn to_box_region(b: &NormalizedBox, width: u32, height: u32) -> PixelRegion {
    PixelRegion {
        left: clamp_px((b.x_min * width as f64) as i64, width),
        top: clamp_px((b.y_min * height as f64) as i64, height),
        right: clamp_px((b.x_max * width as f64) as i64, width),
        bottom: clamp_px((b.y_max * height as f64) as i64, height),
    }
}

/// Square of half-side `radius` around the point's pixel position, clamped.
pub fn to_point_region(p: &NormalizedPoint, width: u32, height: u32, radius: u32) -> PixelRegion {
    let cx = p.x * width as f64;
    let cy = p.y * height as f64;
    let r = radius as f64;
    PixelRegion {
        left: clamp_px((cx - r) as i64, width),
        top: clamp_px((cy - r) as i64, height),
        right: clamp_px((cx + r) as i64, width),
        bottom: clamp_px((cy + r) as i64, height),
    }
}

/// Unclamped pixel rectangle `(left, top, right, bottom)` of a box, used for
/// its outline and label anchor.
pub fn box_outline(b: &NormalizedBox, width: u32, height: u32) -> (i32, i32, i32, i32) {
    (
        (b.x_min * width as f64) as i32,
        (b.y_min * height as f64) as i32,
        (b.x_max * width as f64) as i32,
        (b.y_max * height as f64) as i32,
    )
}

/// Unclamped pixel position of a point, used for its marker.
pub fn point_center(p: &NormalizedPoint, width: u32, height: u32) -> (i32, i32) {
    ((p.x * width as f64) as i32, (p.y * height as f64) as i32)
}

// Float-to-int casts saturate and map NaN to 0.
fn clamp_px(value: i64, limit: u32) -> u32 {
    value.clamp(0, limit as i64) as u32
}
