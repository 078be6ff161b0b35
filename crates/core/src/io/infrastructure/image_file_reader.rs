use std::path::Path;

use crate::io::domain::image_reader::ImageReader;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Decodes image files with the `image` crate. Grayscale, palette and
/// alpha images are converted to RGB; alpha is dropped.
#[derive(Default)]
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)
            .map_err(|e| format!("Failed to read image {}: {e}", path.display()))?
            .to_rgb8();
        log::debug!(
            "Read {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(Frame::from_rgb_image(img))
    }
}

/// Whether the path has one of the supported image extensions.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn write_png(dir: &Path, img: image::DynamicImage) -> PathBuf {
        let path = dir.join("input.png");
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_read_rgb_png() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbImage::from_pixel(12, 7, image::Rgb([50, 100, 200]));
        let path = write_png(dir.path(), image::DynamicImage::ImageRgb8(img));

        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (12, 7));
        assert_eq!(frame.pixel(0, 0), [50, 100, 200]);
        assert_eq!(frame.pixel(11, 6), [50, 100, 200]);
    }

    #[test]
    fn test_read_rgba_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 0]));
        let path = write_png(dir.path(), image::DynamicImage::ImageRgba8(img));

        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(frame.data().len(), 4 * 4 * 3);
        assert_eq!(frame.pixel(2, 2), [10, 20, 30]);
    }

    #[test]
    fn test_read_grayscale_expands_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::GrayImage::from_pixel(3, 3, image::Luma([77]));
        let path = write_png(dir.path(), image::DynamicImage::ImageLuma8(img));

        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(frame.pixel(1, 1), [77, 77, 77]);
    }

    #[test]
    fn test_read_nonexistent_returns_error() {
        let result = ImageFileReader::new().read(Path::new("/nonexistent/input.png"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("/nonexistent/input.png"));
    }

    #[test]
    fn test_read_garbage_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(ImageFileReader::new().read(&path).is_err());
    }

    #[rstest]
    #[case("photo.jpg", true)]
    #[case("photo.JPEG", true)]
    #[case("scan.tif", true)]
    #[case("image.webp", true)]
    #[case("clip.mp4", false)]
    #[case("notes.txt", false)]
    #[case("no_extension", false)]
    fn test_is_image(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_image(Path::new(name)), expected);
    }
}
