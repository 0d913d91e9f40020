//! # Size Estimation
//!
//! Picks a point size for one line of text.
//!
//! ## Measured strategy (default)
//!
//! Binary search over `[8, 400]` points against a fit predicate that
//! measures real glyph advances:
//!
//! ```text
//! safe area   = 85% of width × 80% of height
//! width test  = Σ advances <= safe width × 0.98
//! height test = headline + caption + gap <= safe height × ratio
//! ```
//!
//! The caption is modelled as a fraction of the headline's line height, and
//! both the gap and the height ratio get stricter as the canvas gets taller:
//!
//! | aspect ratio | caption | gap      | height ratio |
//! |--------------|---------|----------|--------------|
//! | < 0.5        | 0.7 lh  | 1.25 lh  | 0.60         |
//! | < 0.8        | 0.7 lh  | 0.75 lh  | 0.65         |
//! | otherwise    | 0.6 lh  | 0.5 lh   | 0.70         |
//!
//! When not even the minimum size fits, the size is scaled down to the
//! width directly, never below 6 points.
//!
//! ## Heuristic strategy
//!
//! A closed form calibrated against the placeholder texts. It never touches
//! glyph metrics:
//!
//! ```text
//! primary   = width·7  / (6·len  / cjk)    cjk = 1.8 if CJK else 1
//! secondary = width·32 / (22·len / cjk)    cjk = 1.3 if CJK else 1
//! ```
//!
//! where `len` is never less than the placeholder's length.

use serde::Serialize;
use tracing::trace;

use super::{CanvasGeometry, LayoutOptions};
use crate::error::Result;
use crate::font::{FaceSource, GlyphMetrics};
use crate::text::{self, Role};

/// Parameters of the measured binary search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Smallest size the search tries. Default: 8.0
    pub min_size: f32,
    /// Largest size the search tries. Default: 400.0
    pub max_size: f32,
    /// Search stops once the interval is this narrow. Default: 0.5
    pub tolerance: f32,
    /// Safe-area width as a fraction of the canvas. Default: 0.85
    pub safe_width: f32,
    /// Safe-area height as a fraction of the canvas. Default: 0.8
    pub safe_height: f32,
    /// Share of the safe width the text may use. Default: 0.98
    pub width_margin: f32,
    /// Absolute minimum after the width rescue. Default: 6.0
    pub floor: f32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            min_size: 8.0,
            max_size: 400.0,
            tolerance: 0.5,
            safe_width: 0.85,
            safe_height: 0.8,
            width_margin: 0.98,
            floor: 6.0,
        }
    }
}

/// How font sizes are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeStrategy {
    /// Binary search against measured glyph advances.
    Measured(SearchParams),
    /// Closed-form estimate from the canvas width and character count.
    Heuristic,
}

impl Default for SizeStrategy {
    fn default() -> Self {
        SizeStrategy::Measured(SearchParams::default())
    }
}

/// How an estimate was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeOutcome {
    /// The search found a size that passes the fit predicate.
    Fitted,
    /// Nothing passed; the minimum size fits the width but not the height.
    Minimum,
    /// Nothing passed; the size was scaled so the text spans the safe width.
    WidthRescued,
    /// The width rescue hit the absolute floor.
    Floored,
    /// Closed-form estimate, nothing was measured.
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeEstimate {
    pub size: f32,
    pub outcome: SizeOutcome,
}

/// Estimate the point size for `text` in `role`.
///
/// `text` is the string as it will be drawn (already letter-spaced if
/// spacing is on).
pub fn estimate_font_size<F: FaceSource>(
    text: &str,
    role: Role,
    font: &F,
    canvas: &CanvasGeometry,
    options: &LayoutOptions,
) -> Result<SizeEstimate> {
    match options.strategy {
        SizeStrategy::Measured(params) => measured_size(text, font, canvas, &params),
        SizeStrategy::Heuristic => Ok(SizeEstimate {
            size: heuristic_size(text, role, canvas.width(), options.letter_spacing),
            outcome: SizeOutcome::Heuristic,
        }),
    }
}

/// Closed-form size estimate.
///
/// ```
/// use lgtm::layout::size::heuristic_size;
/// use lgtm::text::Role;
///
/// // "LGTM" is no longer than the placeholder, so it gets the calibrated size
/// let size = heuristic_size("LGTM", Role::Primary, 1200.0, false);
/// assert_eq!(size, 1200.0 * 7.0 / (6.0 * 4.0));
/// ```
pub fn heuristic_size(text: &str, role: Role, width: f32, letter_spacing: bool) -> f32 {
    let placeholder = if letter_spacing {
        text::spaced(role.default_text())
    } else {
        role.default_text().to_string()
    };
    let length = text.chars().count().max(placeholder.chars().count()) as f32;

    let (numerator, denominator, cjk_compensation) = match role {
        Role::Primary => (7.0, 6.0, 1.8),
        Role::Secondary => (32.0, 22.0, 1.3),
    };
    let compensation = if text::contains_cjk(text) {
        cjk_compensation
    } else {
        1.0
    };

    width * numerator / (denominator * length / compensation)
}

/// Binary-search the largest size that passes the fit predicate.
pub fn measured_size<F: FaceSource>(
    text: &str,
    font: &F,
    canvas: &CanvasGeometry,
    params: &SearchParams,
) -> Result<SizeEstimate> {
    let budget = FitBudget::new(canvas, params);

    let mut best = params.min_size;
    let (mut left, mut right) = (params.min_size, params.max_size);
    while right - left > params.tolerance {
        let mid = (left + right) / 2.0;
        if fits(text, font, mid, &budget) {
            best = mid;
            left = mid;
        } else {
            right = mid;
        }
    }

    if fits(text, font, best, &budget) {
        return Ok(SizeEstimate {
            size: best,
            outcome: SizeOutcome::Fitted,
        });
    }

    // Nothing fits: scale straight to the width. A face that cannot be built
    // here is a broken font, not a layout problem.
    let face = font.face(params.min_size)?;
    let width = measure_text_width(&face, text);
    if width <= budget.width {
        return Ok(SizeEstimate {
            size: best,
            outcome: SizeOutcome::Minimum,
        });
    }

    let scaled = params.min_size * (budget.width / width);
    let estimate = if scaled < params.floor {
        SizeEstimate {
            size: params.floor,
            outcome: SizeOutcome::Floored,
        }
    } else {
        SizeEstimate {
            size: scaled,
            outcome: SizeOutcome::WidthRescued,
        }
    };
    Ok(estimate)
}

/// Sum of advances. Missing glyphs count as an `M`; if the font has no `M`
/// either, as half a line height.
pub fn measure_text_width<M: GlyphMetrics>(face: &M, text: &str) -> f32 {
    let fallback = face
        .glyph_advance('M')
        .unwrap_or_else(|| face.line_height() / 2.0);
    text.chars()
        .map(|ch| face.glyph_advance(ch).unwrap_or(fallback))
        .sum()
}

/// Pixel budgets for one canvas.
#[derive(Debug, Clone, Copy)]
struct FitBudget {
    /// Safe-area width.
    width: f32,
    /// Safe-area width times the margin.
    max_text_width: f32,
    /// Safe-area height times the aspect-dependent ratio.
    max_text_height: f32,
    vertical: VerticalModel,
}

impl FitBudget {
    fn new(canvas: &CanvasGeometry, params: &SearchParams) -> Self {
        let width = canvas.width() * params.safe_width;
        let vertical = VerticalModel::for_ratio(canvas.aspect_ratio());
        Self {
            width,
            max_text_width: width * params.width_margin,
            max_text_height: canvas.height() * params.safe_height * vertical.height_ratio,
            vertical,
        }
    }
}

/// How much vertical room the two lines are assumed to need.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VerticalModel {
    /// Caption line height relative to the headline's.
    secondary_weight: f32,
    /// Gap between lines, in half line heights.
    spacing: f32,
    /// Share of the safe height both lines may use.
    height_ratio: f32,
}

impl VerticalModel {
    fn for_ratio(ratio: f32) -> Self {
        if ratio < 0.5 {
            Self {
                secondary_weight: 0.7,
                spacing: 2.5,
                height_ratio: 0.6,
            }
        } else if ratio < 0.8 {
            Self {
                secondary_weight: 0.7,
                spacing: 1.5,
                height_ratio: 0.65,
            }
        } else {
            Self {
                secondary_weight: 0.6,
                spacing: 1.0,
                height_ratio: 0.7,
            }
        }
    }

    fn total_height(&self, line_height: f32) -> f32 {
        let gap = line_height * 0.5;
        line_height + line_height * self.secondary_weight + gap * self.spacing
    }
}

fn fits<F: FaceSource>(text: &str, font: &F, size: f32, budget: &FitBudget) -> bool {
    let Ok(face) = font.face(size) else {
        return false;
    };

    let width = measure_text_width(&face, text);
    if width > budget.max_text_width {
        trace!(size, width, "too wide");
        return false;
    }

    let total = budget.vertical.total_height(face.line_height());
    if total > budget.max_text_height {
        trace!(size, total, "too tall");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::fixed::FixedFont;

    fn canvas(w: u32, h: u32) -> CanvasGeometry {
        CanvasGeometry::new(w, h).unwrap()
    }

    #[test]
    fn test_heuristic_primary_default_length() {
        // "L G T M" is 7 characters
        let size = heuristic_size("L G T M", Role::Primary, 700.0, true);
        assert!((size - 700.0 * 7.0 / 42.0).abs() < 1e-3);
    }

    #[test]
    fn test_heuristic_short_text_uses_placeholder_length() {
        let short = heuristic_size("O K", Role::Primary, 700.0, true);
        let default = heuristic_size("L G T M", Role::Primary, 700.0, true);
        assert_eq!(short, default);
    }

    #[test]
    fn test_heuristic_long_text_shrinks() {
        let long = heuristic_size("Approved with comments", Role::Secondary, 1000.0, false);
        let expected = 1000.0 * 32.0 / (22.0 * 22.0);
        assert!((long - expected).abs() < 1e-3);
    }

    #[test]
    fn test_heuristic_cjk_compensation() {
        let latin = heuristic_size("abc", Role::Primary, 600.0, true);
        let cjk = heuristic_size("あいう", Role::Primary, 600.0, true);
        assert!((cjk / latin - 1.8).abs() < 1e-4);

        let latin = heuristic_size("abc", Role::Secondary, 600.0, true);
        let cjk = heuristic_size("あいう", Role::Secondary, 600.0, true);
        assert!((cjk / latin - 1.3).abs() < 1e-4);
    }

    #[test]
    fn test_heuristic_counts_characters_not_bytes() {
        // 20 kana: 60 bytes, 20 chars
        let kana = "あ".repeat(20);
        let latin = "a".repeat(20);
        let ratio = heuristic_size(&kana, Role::Primary, 900.0, false)
            / heuristic_size(&latin, Role::Primary, 900.0, false);
        assert!((ratio - 1.8).abs() < 1e-4);
    }

    #[test]
    fn test_measure_width_sums_advances() {
        let face = FixedFont::default().face(10.0).unwrap();
        assert!((measure_text_width(&face, "abcd") - 24.0).abs() < 1e-4);
        assert_eq!(measure_text_width(&face, ""), 0.0);
    }

    #[test]
    fn test_measure_width_falls_back_to_m() {
        let font = FixedFont {
            coverage: Some("MA"),
            ..Default::default()
        };
        let face = font.face(10.0).unwrap();
        // 'x' is missing and measured as 'M'
        assert!((measure_text_width(&face, "Ax") - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_measure_width_falls_back_to_half_line_height() {
        let font = FixedFont {
            coverage: Some("A"),
            ..Default::default()
        };
        let face = font.face(10.0).unwrap();
        // 'A' = 6.0, 'x' = line height 12.0 / 2
        assert!((measure_text_width(&face, "Ax") - 12.0).abs() < 1e-4);
        assert!((measure_text_width(&face, "xx") - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_measured_width_limited() {
        // 10 chars at 0.6em on a square canvas: width binds long before height
        let font = FixedFont::default();
        let c = canvas(1000, 1000);
        let est = measured_size("abcdefghij", &font, &c, &SearchParams::default()).unwrap();
        assert_eq!(est.outcome, SizeOutcome::Fitted);
        let limit = 1000.0 * 0.85 * 0.98 / 6.0;
        assert!(est.size <= limit);
        assert!(limit - est.size < 0.5, "size {} should be near {}", est.size, limit);
    }

    #[test]
    fn test_measured_height_limited() {
        // One char on a wide strip: height binds
        let font = FixedFont::default();
        let c = canvas(2000, 200);
        let est = measured_size("A", &font, &c, &SearchParams::default()).unwrap();
        assert_eq!(est.outcome, SizeOutcome::Fitted);
        // total = 1.2s * 2.1 <= 200 * 0.8 * 0.7
        let limit = 112.0 / (1.2 * 2.1);
        assert!(est.size <= limit && limit - est.size < 0.5);
    }

    #[test]
    fn test_measured_tall_canvas_is_more_conservative() {
        let font = FixedFont::default();
        let params = SearchParams::default();
        // Same width, only the height differs; height binds in both
        let normal = measured_size("A", &font, &canvas(400, 400), &params).unwrap();
        let tall = measured_size("A", &font, &canvas(400, 1000), &params).unwrap();
        // 400 * 0.8 * 0.7 / (1.2 * 2.1) ≈ 88.9
        // 1000 * 0.8 * 0.6 / (1.2 * 2.95) ≈ 135.6
        assert!(normal.size < 89.0);
        assert!(tall.size < 135.7 && tall.size > 135.0);
    }

    #[test]
    fn test_measured_never_exceeds_max() {
        let font = FixedFont::default();
        let est = measured_size("A", &font, &canvas(8000, 8000), &SearchParams::default()).unwrap();
        assert!(est.size <= 400.0);
        assert!(est.size > 399.0);
    }

    #[test]
    fn test_measured_width_rescue() {
        // 20 chars at 8pt = 96px > 85px safe width
        let font = FixedFont::default();
        let c = canvas(100, 1000);
        let text = "a".repeat(20);
        let est = measured_size(&text, &font, &c, &SearchParams::default()).unwrap();
        assert_eq!(est.outcome, SizeOutcome::WidthRescued);
        let expected = 8.0 * (85.0 / 96.0);
        assert!((est.size - expected).abs() < 1e-3);
    }

    #[test]
    fn test_measured_floor() {
        let font = FixedFont::default();
        let c = canvas(100, 100);
        let text = "a".repeat(200);
        let est = measured_size(&text, &font, &c, &SearchParams::default()).unwrap();
        assert_eq!(est.outcome, SizeOutcome::Floored);
        assert_eq!(est.size, 6.0);
    }

    #[test]
    fn test_measured_minimum_when_only_height_fails() {
        // Short text on a very flat canvas: width fine at 8pt, height not
        let font = FixedFont::default();
        let c = canvas(1000, 10);
        let est = measured_size("A", &font, &c, &SearchParams::default()).unwrap();
        assert_eq!(est.outcome, SizeOutcome::Minimum);
        assert_eq!(est.size, 8.0);
    }

    #[test]
    fn test_measured_face_failure_in_rescue_propagates() {
        let font = FixedFont {
            max_face_size: Some(1.0),
            ..Default::default()
        };
        let err = measured_size("A", &font, &canvas(500, 500), &SearchParams::default());
        assert!(err.is_err());
    }

    #[test]
    fn test_measured_face_failure_during_search_is_not_fit() {
        // Faces above 50pt fail; the search settles just below
        let font = FixedFont {
            max_face_size: Some(50.0),
            ..Default::default()
        };
        let est = measured_size("A", &font, &canvas(2000, 2000), &SearchParams::default()).unwrap();
        assert_eq!(est.outcome, SizeOutcome::Fitted);
        assert!(est.size <= 50.0 && est.size > 49.0);
    }

    #[test]
    fn test_monotonic_in_length() {
        let font = FixedFont::default();
        let c = canvas(640, 480);
        let params = SearchParams::default();
        let mut previous = f32::MAX;
        for n in 1..=120 {
            let est = measured_size(&"W".repeat(n), &font, &c, &params).unwrap();
            assert!(est.size <= previous, "length {} grew: {} > {}", n, est.size, previous);
            previous = est.size;
        }
    }

    #[test]
    fn test_vertical_model_thresholds() {
        assert_eq!(VerticalModel::for_ratio(0.49).height_ratio, 0.6);
        assert_eq!(VerticalModel::for_ratio(0.5).height_ratio, 0.65);
        assert_eq!(VerticalModel::for_ratio(0.79).height_ratio, 0.65);
        assert_eq!(VerticalModel::for_ratio(0.8).height_ratio, 0.7);
        assert!((VerticalModel::for_ratio(1.0).total_height(10.0) - 21.0).abs() < 1e-4);
        assert!((VerticalModel::for_ratio(0.6).total_height(10.0) - 24.5).abs() < 1e-4);
        assert!((VerticalModel::for_ratio(0.2).total_height(10.0) - 29.5).abs() < 1e-4);
    }

    #[test]
    fn test_strategy_dispatch() {
        let font = FixedFont::default();
        let c = canvas(1200, 800);
        let heuristic = LayoutOptions {
            strategy: SizeStrategy::Heuristic,
            letter_spacing: false,
        };
        let est = estimate_font_size("LGTM", Role::Primary, &font, &c, &heuristic).unwrap();
        assert_eq!(est.outcome, SizeOutcome::Heuristic);
        assert_eq!(est.size, 1200.0 * 7.0 / 24.0);

        let measured = LayoutOptions::default();
        let est = estimate_font_size("LGTM", Role::Primary, &font, &c, &measured).unwrap();
        assert_eq!(est.outcome, SizeOutcome::Fitted);
    }
}
