//! Mascot sticker overlay.
//!
//! A PNG composited over the middle of the image. Stickers that do not fit
//! are halved once with nearest-neighbour sampling. On animated images every
//! even frame is nudged right, so the mascot shakes.

use std::collections::HashMap;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageReader, RgbaImage};

use super::{FrameContext, Overlay};
use crate::error::Result;

/// Horizontal nudge applied on even animation frames.
const SHAKE_PX: i64 = 3;

pub struct MascotOverlay {
    sticker: RgbaImage,
    // Halved stickers by frame size; `None` when the original fits
    fitted: HashMap<(u32, u32), Option<RgbaImage>>,
}

impl MascotOverlay {
    pub fn new(sticker: RgbaImage) -> Self {
        Self {
            sticker,
            fitted: HashMap::new(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let sticker = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::new(sticker.to_rgba8()))
    }

    /// Sticker as drawn on a `width` x `height` frame, resized once per size.
    fn sticker_for(&mut self, width: u32, height: u32) -> &RgbaImage {
        let sticker = &self.sticker;
        self.fitted
            .entry((width, height))
            .or_insert_with(|| Self::resized(sticker, width, height))
            .as_ref()
            .unwrap_or(sticker)
    }

    fn resized(sticker: &RgbaImage, width: u32, height: u32) -> Option<RgbaImage> {
        let (w, h) = sticker.dimensions();
        if w < width && h < height {
            return None;
        }
        Some(imageops::resize(
            sticker,
            (w / 2).max(1),
            (h / 2).max(1),
            FilterType::Nearest,
        ))
    }

    /// Top-left corner of the sticker on the frame.
    fn origin(frame: (u32, u32), sticker: (u32, u32), ctx: FrameContext) -> (i64, i64) {
        let mut x = (frame.0 as i64 - sticker.0 as i64) / 2;
        let y = (frame.1 as i64 - sticker.1 as i64) / 2;
        if ctx.is_animated() && ctx.index % 2 == 0 {
            x += SHAKE_PX;
        }
        (x, y)
    }
}

impl Overlay for MascotOverlay {
    fn name(&self) -> &'static str {
        "mascot"
    }

    fn apply(&mut self, frame: &mut RgbaImage, ctx: FrameContext) -> Result<()> {
        let (width, height) = frame.dimensions();
        let sticker = self.sticker_for(width, height);
        let (x, y) = Self::origin((width, height), sticker.dimensions(), ctx);
        imageops::overlay(frame, sticker, x, y);
        Ok(())
    }
}
