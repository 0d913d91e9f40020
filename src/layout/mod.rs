//! # Auto Layout
//!
//! Decides how big each line of text is and where it goes, for any canvas
//! from a 50px thumbnail to a 10:1 panorama.
//!
//! ```text
//! ┌──────────────────────────────┐  ┬
//! │                              │  │ margin_y (bucket dependent)
//! │           L G T M            │  ├ primary y   = margin + safe·0.30
//! │                              │  │
//! │   L o o k s   G o o d ...    │  ├ secondary y = margin + safe·0.70
//! │                              │  │ margin_y
//! └──────────────────────────────┘  ┴
//! ```
//!
//! Two independent pieces do the work:
//!
//! - [`size`] picks a point size so the text fits the safe area, leaving
//!   vertical room for both lines.
//! - [`place`] picks the anchor (the center of the line) from the aspect
//!   ratio bucket, keeping the caption clear of the headline.
//!
//! Everything here is a pure function of its inputs. Dimensions must be
//! positive; [`CanvasGeometry::new`] is the only way in and rejects zero.

pub mod place;
pub mod size;

use serde::Serialize;
use tracing::debug;

use crate::error::{LgtmError, Result};
use crate::font::{FaceSource, GlyphMetrics};
use crate::text::Role;

pub use place::{Anchor, AspectBucket};
pub use size::{SearchParams, SizeEstimate, SizeOutcome, SizeStrategy};

/// Pixel dimensions of the image being drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasGeometry {
    width: u32,
    height: u32,
}

impl CanvasGeometry {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LgtmError::DegenerateGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width_px(&self) -> u32 {
        self.width
    }

    pub fn height_px(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> f32 {
        self.width as f32
    }

    pub fn height(&self) -> f32 {
        self.height as f32
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn bucket(&self) -> AspectBucket {
        AspectBucket::from_ratio(self.aspect_ratio())
    }
}

/// Knobs that change layout results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub strategy: SizeStrategy,
    /// Whether the texts handed to the layout were letter-spaced. The
    /// heuristic strategy compares against the placeholder text spaced the
    /// same way.
    pub letter_spacing: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            strategy: SizeStrategy::default(),
            letter_spacing: true,
        }
    }
}

/// Size and position of one line of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    pub font_size_pt: f32,
    pub anchor: Anchor,
    pub outcome: SizeOutcome,
}

/// Layout of both lines for one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairLayout {
    pub canvas: CanvasGeometry,
    pub bucket: AspectBucket,
    pub primary: LayoutResult,
    pub secondary: LayoutResult,
}

/// Lay out a single line.
///
/// A `Secondary` line needs the headline's metrics to stay clear of it.
/// With only one text available, those are estimated from `text` laid out
/// as `Primary`; use [`layout_pair`] when the real headline is known.
pub fn layout_text<F: FaceSource>(
    text: &str,
    role: Role,
    font: &F,
    width: u32,
    height: u32,
    options: &LayoutOptions,
) -> Result<LayoutResult> {
    let canvas = CanvasGeometry::new(width, height)?;
    match role {
        Role::Primary => layout_primary(text, font, &canvas, options),
        Role::Secondary => layout_secondary(text, text, font, &canvas, options),
    }
}

/// Lay out the headline and the caption for one canvas.
pub fn layout_pair<F: FaceSource>(
    primary: &str,
    secondary: &str,
    font: &F,
    width: u32,
    height: u32,
    options: &LayoutOptions,
) -> Result<PairLayout> {
    let canvas = CanvasGeometry::new(width, height)?;
    let primary_layout = layout_primary(primary, font, &canvas, options)?;
    let secondary_layout = layout_secondary(primary, secondary, font, &canvas, options)?;
    Ok(PairLayout {
        canvas,
        bucket: canvas.bucket(),
        primary: primary_layout,
        secondary: secondary_layout,
    })
}

fn layout_primary<F: FaceSource>(
    text: &str,
    font: &F,
    canvas: &CanvasGeometry,
    options: &LayoutOptions,
) -> Result<LayoutResult> {
    let estimate = size::estimate_font_size(text, Role::Primary, font, canvas, options)?;
    let anchor = place::primary_anchor(canvas);
    debug!(
        width = canvas.width_px(),
        height = canvas.height_px(),
        size = estimate.size,
        outcome = ?estimate.outcome,
        y = anchor.y,
        "primary layout"
    );
    Ok(LayoutResult {
        font_size_pt: estimate.size,
        anchor,
        outcome: estimate.outcome,
    })
}

fn layout_secondary<F: FaceSource>(
    primary_text: &str,
    text: &str,
    font: &F,
    canvas: &CanvasGeometry,
    options: &LayoutOptions,
) -> Result<LayoutResult> {
    // Headline metrics are computed directly rather than through its own
    // placement, so the two roles never depend on each other's anchors.
    let primary = size::estimate_font_size(primary_text, Role::Primary, font, canvas, options)?;
    let estimate = size::estimate_font_size(text, Role::Secondary, font, canvas, options)?;

    let anchor = match (font.face(primary.size), font.face(estimate.size)) {
        (Ok(primary_face), Ok(face)) => {
            place::secondary_anchor(canvas, primary_face.line_height(), face.line_height())
        }
        (Err(e), _) | (_, Err(e)) => {
            debug!(error = %e, "metrics unavailable, using fixed secondary placement");
            place::fallback_anchor(canvas)
        }
    };
    debug!(
        width = canvas.width_px(),
        height = canvas.height_px(),
        size = estimate.size,
        outcome = ?estimate.outcome,
        y = anchor.y,
        "secondary layout"
    );
    Ok(LayoutResult {
        font_size_pt: estimate.size,
        anchor,
        outcome: estimate.outcome,
    })
}
