//! Centered text rasterization onto RGBA frames.
//!
//! Glyphs are laid out on a single line with plain advances (no kerning,
//! matching how the layout engine measures), outlined with `ab_glyph`, and
//! alpha-blended into the frame by coverage. Each glyph is drawn by the
//! first typeface in the font's fallback chain that has it.

use ab_glyph::{Font, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::font::{FaceSource, LayoutFont};
use crate::layout::Anchor;

/// Pixel box of a drawn line: advance width by line-box height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Draw `text` so that the middle of its line box sits on `anchor`.
///
/// Pixels outside the image are clipped. Returns the line box.
pub fn draw_text_centered(
    image: &mut RgbaImage,
    text: &str,
    font: &LayoutFont,
    size_pt: f32,
    color: Rgba<u8>,
    anchor: Anchor,
) -> Result<TextBox> {
    let face = font.face(size_pt)?;

    // Layout: compute glyph positions
    let mut glyphs = Vec::new();
    let mut caret_x = 0.0f32;
    for ch in text.chars() {
        let glyph = face.resolve(ch);
        let advance = glyph.scaled.h_advance(glyph.id);
        glyphs.push((glyph, caret_x));
        caret_x += advance;
    }

    let ascent = face.ascent();
    let descent = face.descent();
    let left = anchor.x - caret_x / 2.0;
    let baseline_y = anchor.y + (ascent + descent) / 2.0;

    let (width, height) = (image.width() as i32, image.height() as i32);
    for (resolved, glyph_x) in &glyphs {
        let glyph = resolved
            .id
            .with_scale_and_position(resolved.scaled.scale, point(left + glyph_x, baseline_y));

        if let Some(outlined) = resolved.scaled.font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && x < width && y >= 0 && y < height {
                    blend(image.get_pixel_mut(x as u32, y as u32), color, coverage);
                }
            });
        }
    }

    Ok(TextBox {
        left,
        top: baseline_y - ascent,
        width: caret_x,
        height: ascent - descent,
    })
}

/// Source-over blend of `color` at `coverage` onto `pixel`.
fn blend(pixel: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * (color[3] as f32 / 255.0);
    if alpha <= 0.0 {
        return;
    }
    for c in 0..3 {
        let dst = pixel[c] as f32;
        let src = color[c] as f32;
        pixel[c] = (dst + (src - dst) * alpha).round() as u8;
    }
    let dst_alpha = pixel[3] as f32 / 255.0;
    pixel[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
}
