//! # Placement
//!
//! Anchors are the center of a line of text. `x` is always the middle of
//! the canvas; `y` depends on the aspect-ratio bucket:
//!
//! | bucket | ratio      | margin | primary y | secondary y        |
//! |--------|------------|--------|-----------|--------------------|
//! | wide   | > 2.0      | 15%    | 0.35      | 0.65               |
//! | normal | 0.5 ..= 2  | 10%    | 0.30      | 0.70               |
//! | tall   | < 0.5      | 5%     | 0.15      | below the headline |
//!
//! Ratios are fractions of the safe height (`height - 2·margin`), measured
//! from the top margin. On tall canvases the caption follows the headline
//! at a distance of two caption lines instead of sitting at a fixed ratio.

use serde::Serialize;

use super::CanvasGeometry;

/// Coarse classification of canvas shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectBucket {
    Wide,
    Normal,
    Tall,
}

impl AspectBucket {
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio > 2.0 {
            AspectBucket::Wide
        } else if ratio < 0.5 {
            AspectBucket::Tall
        } else {
            AspectBucket::Normal
        }
    }

    /// Top/bottom margin as a fraction of the canvas height.
    pub fn margin_fraction(self) -> f32 {
        match self {
            AspectBucket::Wide => 0.15,
            AspectBucket::Normal => 0.10,
            AspectBucket::Tall => 0.05,
        }
    }

    /// Headline position as a fraction of the safe height.
    pub fn primary_ratio(self) -> f32 {
        match self {
            AspectBucket::Wide => 0.35,
            AspectBucket::Normal => 0.30,
            AspectBucket::Tall => 0.15,
        }
    }

    /// Caption position for buckets where it is fixed.
    fn secondary_ratio(self) -> Option<f32> {
        match self {
            AspectBucket::Wide => Some(0.65),
            AspectBucket::Normal => Some(0.70),
            AspectBucket::Tall => None,
        }
    }

    /// Caption position used when font metrics are unavailable.
    fn fallback_ratio(self) -> f32 {
        match self {
            AspectBucket::Wide => 0.6,
            AspectBucket::Normal => 2.0 / 3.0,
            AspectBucket::Tall => 0.75,
        }
    }
}

/// Center point of a line of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Vertical frame shared by every placement on one canvas.
#[derive(Debug, Clone, Copy)]
struct Frame {
    bucket: AspectBucket,
    margin: f32,
    safe_height: f32,
    center_x: f32,
}

impl Frame {
    fn new(canvas: &CanvasGeometry) -> Self {
        let bucket = canvas.bucket();
        let margin = canvas.height() * bucket.margin_fraction();
        Self {
            bucket,
            margin,
            safe_height: canvas.height() - margin * 2.0,
            center_x: canvas.width() / 2.0,
        }
    }

    fn at(&self, ratio: f32) -> f32 {
        self.margin + self.safe_height * ratio
    }
}

/// Anchor of the headline.
pub fn primary_anchor(canvas: &CanvasGeometry) -> Anchor {
    let frame = Frame::new(canvas);
    Anchor {
        x: frame.center_x,
        y: frame.at(frame.bucket.primary_ratio()),
    }
}

/// Anchor of the caption, given both lines' line heights.
///
/// The caption never overlaps the headline's line box: on tall canvases it
/// is placed right below it, elsewhere the fixed ratio is pushed down when
/// the lines are big enough to collide. Either way it stays above the
/// bottom margin.
pub fn secondary_anchor(
    canvas: &CanvasGeometry,
    primary_line_height: f32,
    line_height: f32,
) -> Anchor {
    let frame = Frame::new(canvas);
    let primary_y = frame.at(frame.bucket.primary_ratio());
    let lowest = canvas.height() - frame.margin - line_height / 2.0;

    let y = match frame.bucket.secondary_ratio() {
        Some(ratio) => {
            let fixed = frame.at(ratio);
            let clear = primary_y + primary_line_height / 2.0 + line_height / 2.0;
            if clear > fixed {
                clear.min(lowest)
            } else {
                fixed
            }
        }
        None => {
            let min_spacing = line_height * 2.0;
            let y = primary_y + primary_line_height / 2.0 + min_spacing + line_height / 2.0;
            y.min(lowest)
        }
    };

    Anchor {
        x: frame.center_x,
        y,
    }
}

/// Fixed-ratio caption anchor that needs no font metrics.
pub fn fallback_anchor(canvas: &CanvasGeometry) -> Anchor {
    let frame = Frame::new(canvas);
    Anchor {
        x: frame.center_x,
        y: frame.at(frame.bucket.fallback_ratio()),
    }
}
