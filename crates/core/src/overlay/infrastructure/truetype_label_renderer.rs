use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use thiserror::Error;

use crate::overlay::domain::label_renderer::{anchor_in_reach, LabelRenderer};
use crate::shared::constants::SYSTEM_FONT_PATHS;

#[derive(Error, Debug)]
pub enum FontLoadError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font file: {path}")]
    Parse { path: PathBuf },
}

/// Renders labels with a TrueType/OpenType font via `ab_glyph`.
pub struct TrueTypeLabelRenderer {
    font: FontVec,
    scale: PxScale,
}

impl TrueTypeLabelRenderer {
    pub fn from_path(path: &Path, size: f32) -> Result<Self, FontLoadError> {
        let data = fs::read(path).map_err(|e| FontLoadError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| FontLoadError::Parse {
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }

    /// First loadable font from [`SYSTEM_FONT_PATHS`], if any.
    pub fn from_system(size: f32) -> Option<Self> {
        SYSTEM_FONT_PATHS.iter().find_map(|path| {
            let renderer = Self::from_path(Path::new(path), size).ok()?;
            log::debug!("Loaded system font: {path}");
            Some(renderer)
        })
    }
}

impl LabelRenderer for TrueTypeLabelRenderer {
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        if !anchor_in_reach(canvas, x, y) {
            return;
        }
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }

    fn name(&self) -> &'static str {
        "truetype"
    }
}
