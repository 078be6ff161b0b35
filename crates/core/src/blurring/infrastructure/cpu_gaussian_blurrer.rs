use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::shared::constants::DEFAULT_BLUR_RADIUS;
use crate::shared::frame::{Frame, CHANNELS};

use super::gaussian;

/// CPU whole-frame blurrer using a separable Gaussian.
///
/// Large kernels run on an area-downscaled copy and are upscaled back,
/// which keeps strong blurs affordable on big images.
pub struct CpuGaussianBlurrer {
    kernel: Vec<f32>,
    scale: usize,
    small_kernel: Vec<f32>,
}

impl CpuGaussianBlurrer {
    /// `radius` is the Gaussian sigma in pixels, capped at
    /// [`MAX_BLUR_RADIUS`](crate::shared::constants::MAX_BLUR_RADIUS).
    pub fn new(radius: f64) -> Self {
        Self::with_kernel_size(gaussian::kernel_size_for_radius(radius))
    }

    pub fn with_kernel_size(kernel_size: usize) -> Self {
        let kernel_size = kernel_size.max(1) | 1;
        let scale = gaussian::downscale_factor(kernel_size);
        let small_k = (kernel_size / scale) | 1; // ensure odd
        Self {
            kernel: gaussian::gaussian_kernel_1d(kernel_size),
            scale,
            small_kernel: gaussian::gaussian_kernel_1d(small_k),
        }
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel.len()
    }
}

impl Default for CpuGaussianBlurrer {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_RADIUS)
    }
}

impl FrameBlurrer for CpuGaussianBlurrer {
    fn blur(&self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let mut temp = Vec::new();
        gaussian::blur_in_place(
            frame.data_mut(),
            width,
            height,
            CHANNELS,
            &self.kernel,
            &self.small_kernel,
            self.scale,
            &mut temp,
        );
        Ok(())
    }
}
