/// Gaussian blur radius (sigma, in pixels) for the concealed base layer.
pub const DEFAULT_BLUR_RADIUS: f64 = 15.0;

/// Largest accepted blur radius. Larger values are capped so the kernel
/// stays a few thousand taps long.
pub const MAX_BLUR_RADIUS: f64 = 500.0;

/// Half-side of the square disclosed around each pointed location.
pub const DEFAULT_POINT_RADIUS: u32 = 20;

pub const DEFAULT_MARKER_RADIUS: i32 = 5;
pub const DEFAULT_OUTLINE_WIDTH: u32 = 2;

/// Vertical distance from a box's top edge to its label's top edge.
pub const DEFAULT_LABEL_OFFSET: i32 = 15;
pub const DEFAULT_LABEL_SIZE: f32 = 15.0;

pub const BOX_ACCENT: [u8; 3] = [255, 0, 0];
pub const POINT_ACCENT: [u8; 3] = [0, 0, 255];

pub const MOONDREAM_ENDPOINT: &str = "https://api.moondream.ai/v1";
pub const MOONDREAM_API_KEY_ENV: &str = "MOONDREAM_API_KEY";
pub const MOONDREAM_ENDPOINT_ENV: &str = "MOONDREAM_ENDPOINT";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp", "gif"];

/// Fonts tried, in order, when no font is configured.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];
