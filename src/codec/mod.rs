//! # Image Codec
//!
//! Decoding and encoding of the three supported formats.
//!
//! | Format | Decode                         | Encode               |
//! |--------|--------------------------------|----------------------|
//! | JPEG   | single frame, EXIF orientation | quality 95, no alpha |
//! | PNG    | single frame, EXIF orientation | RGBA                 |
//! | GIF    | every frame with its delay     | loops forever        |
//!
//! The format is sniffed from the file contents, not the extension.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{AnimationDecoder, DynamicImage, Frame, ImageDecoder, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{LgtmError, Result};

/// JPEG output quality.
pub const JPEG_QUALITY: u8 = 95;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Jpeg,
    Png,
    Gif,
}

impl Format {
    pub fn from_image_format(format: ImageFormat) -> Result<Self> {
        match format {
            ImageFormat::Jpeg => Ok(Format::Jpeg),
            ImageFormat::Png => Ok(Format::Png),
            ImageFormat::Gif => Ok(Format::Gif),
            other => Err(LgtmError::UnsupportedFormat(format!("{:?}", other))),
        }
    }

    /// Format implied by a file extension, if it is one of ours.
    pub fn from_extension(path: &Path) -> Option<Self> {
        ImageFormat::from_path(path)
            .ok()
            .and_then(|f| Self::from_image_format(f).ok())
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::Gif => "gif",
        }
    }
}

/// A decoded image: one frame for stills, all frames for GIFs.
pub struct Decoded {
    pub format: Format,
    pub frames: Vec<Frame>,
}

impl Decoded {
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| f.buffer().dimensions())
            .unwrap_or((0, 0))
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }
}

/// Sniff the format of a file from its first bytes.
pub fn detect_format(path: &Path) -> Result<Format> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| LgtmError::UnsupportedFormat(path.display().to_string()))?;
    Format::from_image_format(format)
}

pub fn decode(path: &Path) -> Result<Decoded> {
    let format = detect_format(path)?;
    let frames = match format {
        Format::Gif => {
            let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
            decoder.into_frames().collect_frames()?
        }
        Format::Jpeg | Format::Png => {
            let mut decoder = ImageReader::open(path)?
                .with_guessed_format()?
                .into_decoder()?;
            let orientation = decoder.orientation()?;
            let mut image = DynamicImage::from_decoder(decoder)?;
            image.apply_orientation(orientation);
            vec![Frame::new(image.to_rgba8())]
        }
    };

    if frames.is_empty() {
        return Err(LgtmError::UnsupportedFormat(format!(
            "{}: no frames",
            path.display()
        )));
    }
    debug!(path = %path.display(), ?format, frames = frames.len(), "decoded");
    Ok(Decoded { format, frames })
}

/// Write frames to `path` in `format`. Still formats use the first frame.
pub fn encode(frames: Vec<Frame>, format: Format, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        Format::Gif => {
            let mut encoder = GifEncoder::new(&mut writer);
            encoder.set_repeat(Repeat::Infinite)?;
            encoder.encode_frames(frames)?;
        }
        Format::Jpeg | Format::Png => {
            let frame = frames
                .into_iter()
                .next()
                .ok_or_else(|| LgtmError::InvalidArgument("nothing to encode".into()))?;
            let image = DynamicImage::ImageRgba8(frame.into_buffer());
            if format == Format::Jpeg {
                let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
                image.to_rgb8().write_with_encoder(encoder)?;
            } else {
                image.write_to(&mut writer, ImageFormat::Png)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Where the result goes.
///
/// An explicit output path wins. Otherwise the file lands in the working
/// directory as `<stem>-<suffix>.<ext>`, where the stem is the input file
/// name up to its first dot.
pub fn output_path(input: &Path, output: Option<&Path>, suffix: &str, format: Format) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }
    let stem = input
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("image");
    PathBuf::from(".").join(format!("{}-{}.{}", stem, suffix, format.extension()))
}
