use std::path::Path;

use crate::shared::frame::Frame;

/// Decodes an image file into an RGB [`Frame`].
///
/// Whatever the on-disk format or color type, the result is 8-bit RGB so
/// the compositor never has to care.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;
}
