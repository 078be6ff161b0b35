use std::path::Path;

use crate::overlay::domain::label_renderer::LabelRenderer;

use super::bitmap_label_renderer::BitmapLabelRenderer;
use super::truetype_label_renderer::TrueTypeLabelRenderer;

/// Picks the best available label renderer.
///
/// Order: the configured font, then the first system font found, then the
/// built-in bitmap font. A configured font that fails to load is logged and
/// skipped. Logs which renderer is selected.
pub fn select_label_renderer(font_path: Option<&Path>, size: f32) -> Box<dyn LabelRenderer> {
    if let Some(path) = font_path {
        match TrueTypeLabelRenderer::from_path(path, size) {
            Ok(renderer) => {
                log::info!("Using label font {}", path.display());
                return Box::new(renderer);
            }
            Err(e) => log::warn!("Ignoring configured font: {e}"),
        }
    }

    if let Some(renderer) = TrueTypeLabelRenderer::from_system(size) {
        log::info!("Using system font for labels");
        return Box::new(renderer);
    }

    log::info!("No TrueType font available, using built-in bitmap labels");
    Box::new(BitmapLabelRenderer::for_size(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_broken_configured_font_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"nope").unwrap();

        let renderer = select_label_renderer(Some(&path), 15.0);
        assert!(["truetype", "bitmap"].contains(&renderer.name()));
    }

    #[test]
    fn test_selected_renderer_draws() {
        let renderer = select_label_renderer(None, 15.0);
        let mut canvas = RgbImage::new(80, 30);
        renderer.draw(&mut canvas, 2, 2, "Label 1", Rgb([255, 0, 0]));
        assert!(canvas.pixels().any(|p| p.0[0] > 0));
    }
}
