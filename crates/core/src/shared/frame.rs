use image::RgbImage;
use ndarray::{s, ArrayView3, ArrayViewMut3};

use crate::shared::region::PixelRegion;

/// Bytes per pixel. Every frame is 8-bit RGB.
pub const CHANNELS: usize = 3;

/// A single image: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the compositing layer
/// reads and writes this buffer and nothing else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A frame where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * CHANNELS)
            .collect();
        Self::new(data, width, height)
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height)
    }

    pub fn into_rgb_image(self) -> Result<RgbImage, Box<dyn std::error::Error>> {
        RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| "frame data length does not match its dimensions".into())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB value at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels inside `region` into a new frame.
    ///
    /// The region is clipped to this frame first, so an empty or
    /// out-of-bounds region yields a zero-sized frame.
    pub fn crop(&self, region: &PixelRegion) -> Frame {
        let clipped = region.clip_to(self.width, self.height);
        if clipped.is_empty() {
            return Frame::new(Vec::new(), 0, 0);
        }
        let (l, t, r, b) = clipped.bounds_usize();
        let data: Vec<u8> = self
            .as_ndarray()
            .slice(s![t..b, l..r, ..])
            .iter()
            .copied()
            .collect();
        Frame::new(data, clipped.width(), clipped.height())
    }

    /// Overwrites pixels starting at `(left, top)` with `patch`.
    ///
    /// Parts of the patch falling outside this frame are dropped. No blending.
    pub fn paste(&mut self, patch: &Frame, left: u32, top: u32) {
        if left >= self.width || top >= self.height {
            return;
        }
        let w = patch.width.min(self.width - left) as usize;
        let h = patch.height.min(self.height - top) as usize;
        if w == 0 || h == 0 {
            return;
        }
        let (l, t) = (left as usize, top as usize);
        let src = patch.as_ndarray();
        let mut dst = self.as_ndarray_mut();
        dst.slice_mut(s![t..t + h, l..l + w, ..])
            .assign(&src.slice(s![0..h, 0..w, ..]));
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}
