use std::path::Path;

use crate::shared::frame::Frame;

/// Encodes a [`Frame`] to an image file. The format follows the path's
/// extension.
pub trait ImageWriter: Send {
    /// With `max_side`, frames larger than that on either axis are shrunk
    /// to fit, keeping the aspect ratio. Smaller frames are written as is.
    fn write(
        &self,
        frame: &Frame,
        path: &Path,
        max_side: Option<u32>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
