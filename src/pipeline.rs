//! # Pipeline
//!
//! Decode, draw every overlay on every frame, encode.
//!
//! ```
//! use lgtm::pipeline::Pipeline;
//! use lgtm::render::ConcentrationLines;
//!
//! let pipeline = Pipeline::new().with(ConcentrationLines::default());
//! assert_eq!(pipeline.suffix(), "concentration");
//! ```

use std::path::{Path, PathBuf};

use image::Frame;
use tracing::info;

use crate::codec::{self, Format};
use crate::error::Result;
use crate::render::{FrameContext, Overlay};

/// Ordered list of overlays.
#[derive(Default)]
pub struct Pipeline {
    overlays: Vec<Box<dyn Overlay>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an overlay; overlays are drawn in insertion order.
    pub fn with(mut self, overlay: impl Overlay + 'static) -> Self {
        self.overlays.push(Box::new(overlay));
        self
    }

    pub fn push(&mut self, overlay: Box<dyn Overlay>) {
        self.overlays.push(overlay);
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Output file suffix: the name of the last overlay drawn.
    pub fn suffix(&self) -> &'static str {
        self.overlays.last().map(|o| o.name()).unwrap_or("lgtm")
    }

    /// Draw every overlay onto every frame.
    pub fn apply(&mut self, frames: &mut [Frame]) -> Result<()> {
        let count = frames.len();
        for (index, frame) in frames.iter_mut().enumerate() {
            let ctx = FrameContext { index, count };
            for overlay in &mut self.overlays {
                overlay.apply(frame.buffer_mut(), ctx)?;
            }
        }
        Ok(())
    }

    /// Process `input` and write the result, returning the path written.
    ///
    /// Without an explicit `output` the result is named after the input
    /// (see [`codec::output_path`]). An explicit output with a still-image
    /// extension picks the output format for still inputs; animated input
    /// is always written as GIF.
    pub fn run(&mut self, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let mut decoded = codec::decode(input)?;
        let (width, height) = decoded.dimensions();
        info!(
            input = %input.display(),
            format = ?decoded.format,
            width,
            height,
            frames = decoded.frames.len(),
            "loaded image"
        );

        self.apply(&mut decoded.frames)?;

        let format = match (decoded.format, output.and_then(Format::from_extension)) {
            (Format::Gif, _) => Format::Gif,
            (_, Some(requested @ (Format::Jpeg | Format::Png))) => requested,
            (source, _) => source,
        };
        let path = codec::output_path(input, output, self.suffix(), format);
        codec::encode(decoded.frames, format, &path)?;
        info!(output = %path.display(), ?format, "wrote image");
        Ok(path)
    }
}
