//! # LGTM - Image Overlay Library
//!
//! Draws a big "LGTM" headline and a "Looks Good To Me" caption on any image,
//! sized and placed automatically for the image's shape. It provides:
//!
//! - **Auto layout**: font size search and aspect-ratio aware placement
//! - **Text rendering**: TrueType rasterization with `ab_glyph`
//! - **Effects**: concentration lines and a mascot sticker
//! - **Codecs**: JPEG, PNG and animated GIF in, same format out
//!
//! ## Quick Start
//!
//! ```
//! use lgtm::{LayoutFont, LayoutOptions, Role, layout_text};
//!
//! let font = LayoutFont::embedded()?;
//! let options = LayoutOptions::default();
//! let result = layout_text("L G T M", Role::Primary, &font, 1920, 1080, &options)?;
//!
//! assert_eq!(result.anchor.x, 960.0);
//! assert!(result.font_size_pt > 60.0);
//! # Ok::<(), lgtm::LgtmError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`layout`] | Font sizing and anchor placement |
//! | [`text`] | Text items, letter spacing, script detection |
//! | [`font`] | Font loading and per-size metrics |
//! | [`render`] | Overlays drawn onto frames |
//! | [`codec`] | Image decoding and encoding |
//! | [`pipeline`] | Decode, draw, encode |
//! | [`config`] | Text overlay configuration |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`error`] | Error types |

pub mod codec;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod text;

// Re-exports for convenience
pub use config::OverlayConfig;
pub use error::LgtmError;
pub use font::{FaceSource, GlyphMetrics, LayoutFont};
pub use layout::{
    Anchor, AspectBucket, CanvasGeometry, LayoutOptions, LayoutResult, PairLayout, SizeOutcome,
    SizeStrategy, layout_pair, layout_text,
};
pub use pipeline::Pipeline;
pub use text::{Role, TextColor, TextItem};
