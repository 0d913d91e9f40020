//! # Fonts
//!
//! Glyph metrics for the layout engine and glyph outlines for rendering.
//!
//! The layout engine only ever asks two questions of a font at a given point
//! size: "how far does the caret move after this character?" and "how tall
//! is one line?". Those questions are the [`GlyphMetrics`] trait, and
//! [`FaceSource`] builds a metrics handle for a size. [`LayoutFont`] answers
//! them with `ab_glyph`; tests answer them with fixed numbers.
//!
//! Sizes are points at 72 DPI, so one point is one pixel and a 100pt face
//! has a 100px em square.
//!
//! ## Fallback fonts
//!
//! A [`LayoutFont`] is a primary typeface plus an ordered list of fallbacks.
//! Each character comes from the first typeface that has a glyph for it;
//! line metrics always come from the primary. The embedded DejaVu Sans Bold
//! covers Latin only, so Japanese text needs a fallback: either given
//! explicitly or found among the usual system CJK fonts
//! ([`LayoutFont::system_cjk`]).

use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, PxScaleFont, ScaleFont};
use tracing::debug;

use crate::error::{LgtmError, Result};

/// DejaVu Sans Bold, used when no font is given on the command line.
pub(crate) static DEFAULT_FONT: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");

/// Bold Japanese-capable fonts shipped by common distributions and OSes,
/// in order of preference.
const SYSTEM_CJK_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/OTF/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansJP-Bold.otf",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/usr/share/fonts/opentype/ipaexfont-gothic/ipaexg.ttf",
    "/usr/share/fonts/truetype/takao-gothic/TakaoPGothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W6.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\YuGothB.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

/// Metrics of a font instantiated at one size.
pub trait GlyphMetrics {
    /// Horizontal advance in pixels, or `None` when the font has no glyph
    /// for `ch`.
    fn glyph_advance(&self, ch: char) -> Option<f32>;

    /// Distance between two baselines in pixels.
    fn line_height(&self) -> f32;
}

/// Something that can produce [`GlyphMetrics`] for a point size.
pub trait FaceSource {
    type Face: GlyphMetrics;

    /// Instantiate the font at `size_pt`.
    fn face(&self, size_pt: f32) -> Result<Self::Face>;
}

/// One parsed TTF/OTF font.
#[derive(Clone)]
struct Typeface {
    font: FontArc,
    units_per_em: f32,
}

impl Typeface {
    fn new(font: FontArc) -> Result<Self> {
        let units_per_em = font
            .units_per_em()
            .filter(|upem| *upem > 0.0)
            .ok_or_else(|| LgtmError::FontParse("font has no units-per-em".into()))?;
        if font.height_unscaled() <= 0.0 {
            return Err(LgtmError::FontParse("font has zero line height".into()));
        }
        Ok(Self { font, units_per_em })
    }

    /// `ab_glyph` scale for a point size.
    ///
    /// `PxScale` measures ascent-to-descent rather than the em square, so the
    /// em size has to be converted through the font's own proportions.
    fn px_scale(&self, size_pt: f32) -> PxScale {
        PxScale::from(size_pt * self.font.height_unscaled() / self.units_per_em)
    }

    fn scaled(&self, size_pt: f32) -> PxScaleFont<FontArc> {
        self.font.clone().into_scaled(self.px_scale(size_pt))
    }

    fn covers(&self, ch: char) -> bool {
        self.font.glyph_id(ch) != GlyphId(0)
    }
}

/// A primary font with optional fallbacks.
#[derive(Clone)]
pub struct LayoutFont {
    primary: Typeface,
    fallbacks: Vec<Typeface>,
}

impl std::fmt::Debug for LayoutFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutFont")
            .field("units_per_em", &self.primary.units_per_em)
            .field("fallbacks", &self.fallbacks.len())
            .finish_non_exhaustive()
    }
}

impl LayoutFont {
    /// The embedded default font, without fallbacks.
    pub fn embedded() -> Result<Self> {
        let font = FontArc::try_from_slice(DEFAULT_FONT)
            .map_err(|e| LgtmError::FontParse(format!("embedded font: {}", e)))?;
        Self::from_font(font)
    }

    /// Parse font bytes (TTF, OTF, or the first face of a TTC).
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data).map_err(|e| LgtmError::FontParse(e.to_string()))?;
        Self::from_font(font)
    }

    /// Read and parse a font file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
            .map_err(|e| LgtmError::FontParse(format!("{}: {}", path.display(), e)))
    }

    fn from_font(font: FontArc) -> Result<Self> {
        Ok(Self {
            primary: Typeface::new(font)?,
            fallbacks: Vec::new(),
        })
    }

    /// First installed system font that has Japanese glyphs.
    pub fn system_cjk() -> Option<Self> {
        Self::first_cjk(SYSTEM_CJK_FONTS.iter().map(Path::new))
    }

    fn first_cjk<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Option<Self> {
        candidates
            .into_iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::from_path(path) {
                Ok(font) if font.covers('あ') => {
                    debug!(path = %path.display(), "using system CJK font");
                    Some(font)
                }
                Ok(_) => None,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping system font");
                    None
                }
            })
    }

    /// Append `other` (and its own fallbacks) to the fallback chain.
    pub fn with_fallback(mut self, other: LayoutFont) -> Self {
        self.fallbacks.push(other.primary);
        self.fallbacks.extend(other.fallbacks);
        self
    }

    /// Number of typefaces after the primary.
    pub fn fallback_count(&self) -> usize {
        self.fallbacks.len()
    }

    /// Whether any typeface in the chain has a glyph for `ch`.
    pub fn covers(&self, ch: char) -> bool {
        self.typefaces().any(|t| t.covers(ch))
    }

    fn typefaces(&self) -> impl Iterator<Item = &Typeface> {
        std::iter::once(&self.primary).chain(&self.fallbacks)
    }
}

impl FaceSource for LayoutFont {
    type Face = LayoutFace;

    fn face(&self, size_pt: f32) -> Result<LayoutFace> {
        if !size_pt.is_finite() || size_pt <= 0.0 {
            return Err(LgtmError::FontParse(format!("invalid point size {}", size_pt)));
        }
        Ok(LayoutFace {
            primary: self.primary.scaled(size_pt),
            fallbacks: self.fallbacks.iter().map(|t| t.scaled(size_pt)).collect(),
        })
    }
}

/// A glyph resolved to the typeface that draws it.
pub struct ResolvedGlyph<'a> {
    pub scaled: &'a PxScaleFont<FontArc>,
    pub id: GlyphId,
}

impl ResolvedGlyph<'_> {
    pub fn is_missing(&self) -> bool {
        self.id == GlyphId(0)
    }
}

/// [`LayoutFont`] at one size.
pub struct LayoutFace {
    primary: PxScaleFont<FontArc>,
    fallbacks: Vec<PxScaleFont<FontArc>>,
}

impl LayoutFace {
    /// Find the typeface for `ch`. Characters no typeface covers resolve to
    /// the primary's missing glyph.
    pub fn resolve(&self, ch: char) -> ResolvedGlyph<'_> {
        std::iter::once(&self.primary)
            .chain(&self.fallbacks)
            .map(|scaled| ResolvedGlyph {
                scaled,
                id: scaled.glyph_id(ch),
            })
            .find(|glyph| !glyph.is_missing())
            .unwrap_or(ResolvedGlyph {
                scaled: &self.primary,
                id: GlyphId(0),
            })
    }

    pub fn ascent(&self) -> f32 {
        self.primary.ascent()
    }

    pub fn descent(&self) -> f32 {
        self.primary.descent()
    }
}

impl GlyphMetrics for LayoutFace {
    fn glyph_advance(&self, ch: char) -> Option<f32> {
        let glyph = self.resolve(ch);
        if glyph.is_missing() {
            return None;
        }
        Some(glyph.scaled.h_advance(glyph.id))
    }

    fn line_height(&self) -> f32 {
        self.primary.height() + self.primary.line_gap()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_font_parses() {
        assert!(LayoutFont::embedded().is_ok());
    }

    #[test]
    fn test_garbage_bytes_are_a_font_error() {
        let err = LayoutFont::from_bytes(vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, LgtmError::FontParse(_)));
    }

    #[test]
    fn test_missing_font_file_is_io_error() {
        let err = LayoutFont::from_path("/definitely/not/here.ttf").unwrap_err();
        assert!(matches!(err, LgtmError::Io(_)));
    }

    #[test]
    fn test_advance_scales_linearly() {
        let font = LayoutFont::embedded().unwrap();
        let small = font.face(10.0).unwrap().glyph_advance('M').unwrap();
        let large = font.face(100.0).unwrap().glyph_advance('M').unwrap();
        assert!((large / small - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_em_square_matches_point_size() {
        // DejaVu's 'M' is a little under one em wide; line height a bit more
        let face = LayoutFont::embedded().unwrap().face(100.0).unwrap();
        let m = face.glyph_advance('M').unwrap();
        assert!(m > 90.0 && m < 105.0, "M advance at 100pt: {}", m);
        let lh = face.line_height();
        assert!(lh > 100.0 && lh < 130.0, "line height at 100pt: {}", lh);
    }

    #[test]
    fn test_uncovered_glyph_reports_missing() {
        let font = fixed::FixedFont {
            coverage: Some("ABC"),
            ..Default::default()
        };
        let face = font.face(40.0).unwrap();
        assert!(face.glyph_advance('あ').is_none());
        assert!(face.glyph_advance('A').is_some());
    }

    #[test]
    fn test_embedded_covers_latin() {
        let font = LayoutFont::embedded().unwrap();
        assert!("LGTM Looks Good To Me".chars().all(|ch| font.covers(ch)));
        assert_eq!(font.fallback_count(), 0);
    }

    #[test]
    fn test_chain_prefers_primary() {
        let font = LayoutFont::embedded()
            .unwrap()
            .with_fallback(LayoutFont::embedded().unwrap());
        assert_eq!(font.fallback_count(), 1);

        let face = font.face(40.0).unwrap();
        let glyph = face.resolve('A');
        assert!(!glyph.is_missing());
        assert!(std::ptr::eq(glyph.scaled, &face.primary));
    }

    #[test]
    fn test_chain_reports_characters_nobody_covers() {
        let font = LayoutFont::embedded()
            .unwrap()
            .with_fallback(LayoutFont::embedded().unwrap());
        let face = font.face(40.0).unwrap();
        assert!(!font.covers('\u{10FFFD}'));
        assert!(face.resolve('\u{10FFFD}').is_missing());
        assert!(face.glyph_advance('\u{10FFFD}').is_none());
    }

    #[test]
    fn test_fallbacks_keep_primary_line_metrics() {
        let alone = LayoutFont::embedded().unwrap().face(50.0).unwrap();
        let chained = LayoutFont::embedded()
            .unwrap()
            .with_fallback(LayoutFont::embedded().unwrap())
            .face(50.0)
            .unwrap();
        assert_eq!(alone.line_height(), chained.line_height());
        assert_eq!(alone.ascent(), chained.ascent());
    }

    #[test]
    fn test_cjk_search_skips_unusable_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("broken.ttf");
        std::fs::write(&garbage, b"not a font").unwrap();
        let latin_only = dir.path().join("latin.ttf");
        std::fs::write(&latin_only, DEFAULT_FONT).unwrap();
        let missing = dir.path().join("missing.ttf");

        let candidates = [missing.as_path(), garbage.as_path(), latin_only.as_path()];
        assert!(LayoutFont::first_cjk(candidates).is_none());
    }

    #[test]
    fn test_system_cjk_font_draws_kana_and_kanji() {
        // Only meaningful where a Japanese font is installed
        let Some(cjk) = LayoutFont::system_cjk() else {
            eprintln!("no system CJK font installed, skipping");
            return;
        };
        let font = LayoutFont::embedded().unwrap().with_fallback(cjk);
        let face = font.face(40.0).unwrap();
        assert!(face.glyph_advance('あ').is_some());
        assert!(face.glyph_advance('承').is_some());
        assert!(std::ptr::eq(face.resolve('L').scaled, &face.primary));
    }

    #[test]
    fn test_non_positive_size_is_rejected() {
        let font = LayoutFont::embedded().unwrap();
        assert!(font.face(0.0).is_err());
        assert!(font.face(-3.0).is_err());
        assert!(font.face(f32::NAN).is_err());
    }
}
