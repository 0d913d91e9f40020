//! # Concentration Lines
//!
//! Manga-style speed lines: thin triangles radiating from the middle of the
//! image. Each triangle has its base on a circle reaching past the image
//! corners and its tip at a random distance from the center.
//!
//! ```text
//!    \   |   /
//!     \  |  /        tip   = center + dir · diagonal · U(0.15, 0.35)
//!        ·           base  = center + dir · diagonal · 0.6 ± normal · w
//!     /  |  \        w     = min(width, height) · U(0.003, 0.015)
//!    /   |   \
//! ```
//!
//! Every frame gets a fresh set of lines, so animated output flickers like
//! hand-drawn effect lines.

use std::f32::consts::PI;
use std::fmt;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{FrameContext, Overlay};
use crate::error::Result;

/// Parameters for concentration lines.
#[derive(Debug, Clone)]
pub struct Params {
    /// Number of triangles. Default: 200
    pub count: usize,
    /// Base distance from the center, in diagonals. Default: 0.6
    pub outer: f32,
    /// Tip distance range, in diagonals. Default: 0.15..0.35
    pub inner: (f32, f32),
    /// Base half-width range, in fractions of the short side.
    /// Default: 0.003..0.015
    pub half_width: (f32, f32),
    /// Line color. Default: opaque black
    pub color: Rgba<u8>,
    /// Seed for reproducible output. Default: random
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            count: 200,
            outer: 0.6,
            inner: (0.15, 0.35),
            half_width: (0.003, 0.015),
            color: Rgba([0, 0, 0, 255]),
            seed: None,
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={} inner=({:.2}-{:.2}) width=({:.3}-{:.3})",
            self.count, self.inner.0, self.inner.1, self.half_width.0, self.half_width.1
        )
    }
}

/// Overlay that draws concentration lines.
pub struct ConcentrationLines {
    params: Params,
    rng: StdRng,
}

impl ConcentrationLines {
    pub fn new(params: Params) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        debug!(%params, seed = ?params.seed, "concentration lines");
        Self { params, rng }
    }

    fn draw(&mut self, image: &mut RgbaImage) {
        let (w, h) = (image.width() as f32, image.height() as f32);
        let center = (w / 2.0, h / 2.0);
        let diagonal = (w * w + h * h).sqrt();
        let short_side = w.min(h);
        let outer = diagonal * self.params.outer;

        for _ in 0..self.params.count {
            let angle = self.rng.random_range(0.0..2.0 * PI);
            let inner_ratio = random_between(&mut self.rng, self.params.inner);
            let half_width = short_side * random_between(&mut self.rng, self.params.half_width);

            let (cos, sin) = (angle.cos(), angle.sin());
            let tip = (
                center.0 + cos * diagonal * inner_ratio,
                center.1 + sin * diagonal * inner_ratio,
            );
            let base = (center.0 + cos * outer, center.1 + sin * outer);
            // Perpendicular to the ray
            let normal = (-sin * half_width, cos * half_width);

            fill_triangle(
                image,
                [
                    tip,
                    (base.0 + normal.0, base.1 + normal.1),
                    (base.0 - normal.0, base.1 - normal.1),
                ],
                self.params.color,
            );
        }
    }
}

impl Default for ConcentrationLines {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl Overlay for ConcentrationLines {
    fn name(&self) -> &'static str {
        "concentration"
    }

    fn apply(&mut self, frame: &mut RgbaImage, _ctx: FrameContext) -> Result<()> {
        self.draw(frame);
        Ok(())
    }
}

fn random_between(rng: &mut StdRng, (low, high): (f32, f32)) -> f32 {
    if high > low {
        rng.random_range(low..high)
    } else {
        low
    }
}

/// Scanline fill; a pixel is inside when its center is.
fn fill_triangle(image: &mut RgbaImage, points: [(f32, f32); 3], color: Rgba<u8>) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    let min_y = points.iter().map(|p| p.1).fold(f32::MAX, f32::min);
    let max_y = points.iter().map(|p| p.1).fold(f32::MIN, f32::max);
    let y_start = (min_y.floor() as i64).max(0);
    let y_end = (max_y.ceil() as i64).min(height);

    for y in y_start..y_end {
        let yc = y as f32 + 0.5;
        let mut xs = [0.0f32; 3];
        let mut n = 0;
        for i in 0..3 {
            let a = points[i];
            let b = points[(i + 1) % 3];
            if (a.1 <= yc && yc < b.1) || (b.1 <= yc && yc < a.1) {
                xs[n] = a.0 + (yc - a.1) * (b.0 - a.0) / (b.1 - a.1);
                n += 1;
            }
        }
        if n < 2 {
            continue;
        }
        let (x0, x1) = if xs[0] <= xs[1] {
            (xs[0], xs[1])
        } else {
            (xs[1], xs[0])
        };
        // Center of pixel x is x + 0.5
        let x_start = ((x0 - 0.5).ceil() as i64).max(0);
        let x_end = ((x1 - 0.5).ceil() as i64).min(width);
        for x in x_start..x_end {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}
