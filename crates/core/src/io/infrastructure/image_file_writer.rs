use std::path::Path;

use image::imageops::FilterType;

use crate::io::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

/// Writes frames with the `image` crate, creating missing parent
/// directories first.
#[derive(Default)]
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

/// Size that fits within `max_side` on both axes, preserving aspect ratio.
/// Never upscales and never returns a zero dimension for a non-empty frame.
fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side || max_side == 0 {
        return (width, height);
    }
    let scale = max_side as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        frame: &Frame,
        path: &Path,
        max_side: Option<u32>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = frame.clone().into_rgb_image()?;
        let img = match max_side {
            Some(limit) => {
                let (w, h) = fit_within(img.width(), img.height(), limit);
                if (w, h) == img.dimensions() {
                    img
                } else {
                    log::debug!("Resizing {}x{} to {w}x{h}", img.width(), img.height());
                    image::imageops::resize(&img, w, h, FilterType::Triangle)
                }
            }
            None => img,
        };

        img.save(path)
            .map_err(|e| format!("Failed to write image {}: {e}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_write_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        ImageFileWriter::new()
            .write(&Frame::filled(20, 10, [1, 2, 3]), &path, None)
            .unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_png_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&Frame::filled(50, 50, [50, 100, 200]), &path, None)
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(49, 49).0, [50, 100, 200]);
    }

    #[test]
    fn test_max_side_shrinks_keeping_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        ImageFileWriter::new()
            .write(&Frame::filled(200, 100, [128, 128, 128]), &path, Some(64))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (64, 32));
    }

    #[test]
    fn test_max_side_never_upscales() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("same.png");
        ImageFileWriter::new()
            .write(&Frame::filled(30, 20, [0, 0, 0]), &path, Some(500))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (30, 20));
    }

    #[test]
    fn test_unknown_extension_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.unknownext");
        assert!(ImageFileWriter::new()
            .write(&Frame::filled(4, 4, [0, 0, 0]), &path, None)
            .is_err());
    }

    #[rstest]
    #[case((100, 50), 200, (100, 50))]
    #[case((400, 100), 100, (100, 25))]
    #[case((100, 400), 100, (25, 100))]
    #[case((1000, 1), 10, (10, 1))]
    #[case((64, 64), 0, (64, 64))]
    fn test_fit_within(#[case] size: (u32, u32), #[case] max_side: u32, #[case] expected: (u32, u32)) {
        assert_eq!(fit_within(size.0, size.1, max_side), expected);
    }
}
