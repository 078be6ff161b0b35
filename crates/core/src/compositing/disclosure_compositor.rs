use std::path::Path;

use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::blurring::infrastructure::cpu_gaussian_blurrer::CpuGaussianBlurrer;
use crate::overlay::domain::label_renderer::LabelRenderer;
use crate::overlay::infrastructure::label_renderer_factory::select_label_renderer;
use crate::overlay::infrastructure::overlay_painter::{OverlayPainter, OverlayStyle};
use crate::shared::constants::{DEFAULT_BLUR_RADIUS, DEFAULT_POINT_RADIUS};
use crate::shared::frame::Frame;
use crate::shared::region::{DisclosureRegion, NormalizedBox, NormalizedPoint};

#[derive(Clone, Debug, PartialEq)]
pub struct CompositorOptions {
    /// Gaussian sigma of the concealed base layer.
    pub blur_radius: f64,
    /// Half-side of the square disclosed around each point.
    pub point_radius: u32,
    pub style: OverlayStyle,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            point_radius: DEFAULT_POINT_RADIUS,
            style: OverlayStyle::default(),
        }
    }
}

/// Blurs a whole image, then "declassifies" the given regions by pasting
/// the sharp source pixels back, and draws overlays on top.
///
/// Holds no mutable state; one compositor can serve concurrent requests.
pub struct DisclosureCompositor {
    blurrer: Box<dyn FrameBlurrer>,
    painter: OverlayPainter,
    point_radius: u32,
}

impl DisclosureCompositor {
    pub fn new(
        blurrer: Box<dyn FrameBlurrer>,
        label_renderer: Box<dyn LabelRenderer>,
        options: CompositorOptions,
    ) -> Self {
        Self {
            blurrer,
            painter: OverlayPainter::new(label_renderer, options.style),
            point_radius: options.point_radius,
        }
    }

    /// CPU blurrer plus the best label renderer available on this host.
    pub fn with_options(options: CompositorOptions, font_path: Option<&Path>) -> Self {
        let blurrer = Box::new(CpuGaussianBlurrer::new(options.blur_radius));
        let label_renderer = select_label_renderer(font_path, options.style.label_size);
        Self::new(blurrer, label_renderer, options)
    }

    /// Produces the annotated image. `source` is only read.
    ///
    /// Regions are applied in order, so later regions end up on top where
    /// they overlap. All sharp patches are pasted before any overlay is drawn.
    /// Empty or inverted regions paste nothing but still get their overlay.
    pub fn compose(
        &self,
        source: &Frame,
        regions: &[DisclosureRegion],
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        let (width, height) = (source.width(), source.height());

        let mut output = source.clone();
        self.blurrer.blur(&mut output)?;

        if regions.is_empty() || width == 0 || height == 0 {
            return Ok(output);
        }

        for region in regions {
            let patch_area = region.pixel_region(width, height, self.point_radius);
            if patch_area.is_empty() {
                log::debug!("Skipping empty disclosure patch {patch_area:?}");
                continue;
            }
            let patch = source.crop(&patch_area);
            output.paste(&patch, patch_area.left, patch_area.top);
        }

        let mut canvas = output.into_rgb_image()?;
        for region in regions {
            match region {
                DisclosureRegion::Box(b) => self.painter.draw_box(&mut canvas, b),
                DisclosureRegion::Point(p) => self.painter.draw_point(&mut canvas, p),
            }
        }

        log::debug!(
            "Composited {} regions on {width}x{height} image ({} labels)",
            regions.len(),
            self.painter.label_renderer_name()
        );
        Ok(Frame::from_rgb_image(canvas))
    }

    /// Detection variant: disclose and outline each box.
    pub fn compose_boxes(
        &self,
        source: &Frame,
        boxes: &[NormalizedBox],
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        let regions: Vec<DisclosureRegion> = boxes.iter().cloned().map(Into::into).collect();
        self.compose(source, &regions)
    }

    /// Pointing variant: disclose a square around each point and mark it.
    pub fn compose_points(
        &self,
        source: &Frame,
        points: &[NormalizedPoint],
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        let regions: Vec<DisclosureRegion> = points.iter().copied().map(Into::into).collect();
        self.compose(source, &regions)
    }
}

impl Default for DisclosureCompositor {
    fn default() -> Self {
        Self::with_options(CompositorOptions::default(), None)
    }
}
