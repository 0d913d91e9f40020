//! # Rendering Module
//!
//! Overlays drawn onto decoded frames.
//!
//! ## Modules
//!
//! - [`text`]: Centered text rasterization
//! - [`lines`]: Concentration lines radiating from the center
//! - [`mascot`]: A PNG sticker composited in the middle of the image
//!
//! Every overlay implements [`Overlay`] and is applied once per frame, in
//! the order the pipeline holds them.
//!
//! ## Usage Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use lgtm::config::OverlayConfig;
//! use lgtm::render::{FrameContext, Overlay, TextOverlay};
//!
//! let mut overlay = TextOverlay::new(OverlayConfig::default())?;
//! let mut frame = RgbaImage::from_pixel(640, 480, Rgba([0, 0, 0, 255]));
//! overlay.apply(&mut frame, FrameContext::single())?;
//! # Ok::<(), lgtm::LgtmError>(())
//! ```

pub mod lines;
pub mod mascot;
pub mod text;

use std::collections::HashMap;

use image::RgbaImage;
use tracing::debug;

use crate::config::OverlayConfig;
use crate::error::Result;
use crate::font::LayoutFont;
use crate::layout::{PairLayout, layout_pair};

pub use lines::ConcentrationLines;
pub use mascot::MascotOverlay;

/// Position of a frame in its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub index: usize,
    pub count: usize,
}

impl FrameContext {
    /// Context of a still image.
    pub fn single() -> Self {
        Self { index: 0, count: 1 }
    }

    pub fn is_animated(&self) -> bool {
        self.count > 1
    }
}

/// Something drawn onto every frame.
pub trait Overlay {
    /// Short name, also used as the output file suffix.
    fn name(&self) -> &'static str;

    fn apply(&mut self, frame: &mut RgbaImage, ctx: FrameContext) -> Result<()>;
}

/// Headline and caption, sized and placed by the auto layout.
pub struct TextOverlay {
    config: OverlayConfig,
    font: LayoutFont,
    primary: String,
    secondary: String,
    // GIF frames share one size; layout once per size
    layouts: HashMap<(u32, u32), PairLayout>,
}

impl TextOverlay {
    /// Build from config, loading its font.
    pub fn new(config: OverlayConfig) -> Result<Self> {
        let font = config.load_font()?;
        Ok(Self::with_font(config, font))
    }

    pub fn with_font(config: OverlayConfig, font: LayoutFont) -> Self {
        let primary = config.primary().rendered(config.letter_spacing);
        let secondary = config.secondary().rendered(config.letter_spacing);
        Self {
            config,
            font,
            primary,
            secondary,
            layouts: HashMap::new(),
        }
    }

    /// Layout for a canvas size, computed on first use.
    pub fn layout_for(&mut self, width: u32, height: u32) -> Result<PairLayout> {
        if let Some(layout) = self.layouts.get(&(width, height)) {
            return Ok(*layout);
        }
        let layout = layout_pair(
            &self.primary,
            &self.secondary,
            &self.font,
            width,
            height,
            &self.config.layout_options(),
        )?;
        debug!(
            width,
            height,
            bucket = ?layout.bucket,
            primary_size = layout.primary.font_size_pt,
            secondary_size = layout.secondary.font_size_pt,
            "text layout"
        );
        self.layouts.insert((width, height), layout);
        Ok(layout)
    }

    fn draws_secondary(&self) -> bool {
        !(self.config.skip_empty_secondary && self.secondary.is_empty())
    }
}

impl Overlay for TextOverlay {
    fn name(&self) -> &'static str {
        "lgtm"
    }

    fn apply(&mut self, frame: &mut RgbaImage, _ctx: FrameContext) -> Result<()> {
        let layout = self.layout_for(frame.width(), frame.height())?;
        let color = self.config.color.rgba();

        text::draw_text_centered(
            frame,
            &self.primary,
            &self.font,
            layout.primary.font_size_pt,
            color,
            layout.primary.anchor,
        )?;
        if self.draws_secondary() {
            text::draw_text_centered(
                frame,
                &self.secondary,
                &self.font,
                layout.secondary.font_size_pt,
                color,
                layout.secondary.anchor,
            )?;
        }
        Ok(())
    }
}
