//! # Overlay Configuration
//!
//! Everything a text overlay needs besides the image itself. Values come
//! from the command line; [`OverlayConfig::default`] matches running the
//! tool with no options.

use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::font::LayoutFont;
use crate::layout::{LayoutOptions, SizeStrategy};
use crate::text::{Role, TextColor, TextItem};

/// Text overlay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Headline text, unspaced.
    pub primary_text: String,
    /// Caption text, unspaced.
    pub secondary_text: String,
    pub color: TextColor,
    pub strategy: SizeStrategy,
    /// Draw `"L G T M"` rather than `"LGTM"`.
    pub letter_spacing: bool,
    /// Don't draw the caption when it is empty. It is laid out either way.
    pub skip_empty_secondary: bool,
    /// Font file to use instead of the embedded one.
    pub font_path: Option<PathBuf>,
    /// Fonts for characters the main font lacks, tried in order.
    pub fallback_fonts: Vec<PathBuf>,
    /// After `fallback_fonts`, try an installed CJK font.
    pub system_fallback: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            primary_text: Role::Primary.default_text().to_string(),
            secondary_text: Role::Secondary.default_text().to_string(),
            color: TextColor::default(),
            strategy: SizeStrategy::default(),
            letter_spacing: true,
            skip_empty_secondary: true,
            font_path: None,
            fallback_fonts: Vec::new(),
            system_fallback: true,
        }
    }
}

impl OverlayConfig {
    /// Default config with the given texts; `None` keeps the default text.
    pub fn with_texts(primary: Option<String>, secondary: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            primary_text: primary.unwrap_or(defaults.primary_text),
            secondary_text: secondary.unwrap_or(defaults.secondary_text),
            ..defaults
        }
    }

    pub fn primary(&self) -> TextItem {
        TextItem::new(self.primary_text.clone(), Role::Primary, self.color)
    }

    pub fn secondary(&self) -> TextItem {
        TextItem::new(self.secondary_text.clone(), Role::Secondary, self.color)
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            strategy: self.strategy,
            letter_spacing: self.letter_spacing,
        }
    }

    /// Load the configured font, or the embedded one, with its fallbacks.
    pub fn load_font(&self) -> Result<LayoutFont> {
        let mut font = match &self.font_path {
            Some(path) => LayoutFont::from_path(path)?,
            None => LayoutFont::embedded()?,
        };
        for path in &self.fallback_fonts {
            font = font.with_fallback(LayoutFont::from_path(path)?);
        }
        if self.system_fallback {
            match LayoutFont::system_cjk() {
                Some(cjk) => font = font.with_fallback(cjk),
                None => debug!("no system CJK font found"),
            }
        }
        Ok(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LgtmError;

    #[test]
    fn test_defaults() {
        let config = OverlayConfig::default();
        assert_eq!(config.primary().content(), "LGTM");
        assert_eq!(config.secondary().content(), "Looks Good To Me");
        assert_eq!(config.secondary().role(), Role::Secondary);
        assert!(config.letter_spacing);
        assert!(config.skip_empty_secondary);
        assert_eq!(config.layout_options(), LayoutOptions::default());
    }

    #[test]
    fn test_with_texts() {
        let config = OverlayConfig::with_texts(Some("SHIP IT".into()), None);
        assert_eq!(config.primary_text, "SHIP IT");
        assert_eq!(config.secondary_text, "Looks Good To Me");

        let config = OverlayConfig::with_texts(None, Some(String::new()));
        assert_eq!(config.primary_text, "LGTM");
        assert!(config.secondary().is_empty());
    }

    #[test]
    fn test_layout_options_follow_config() {
        let config = OverlayConfig {
            strategy: SizeStrategy::Heuristic,
            letter_spacing: false,
            ..Default::default()
        };
        let opts = config.layout_options();
        assert_eq!(opts.strategy, SizeStrategy::Heuristic);
        assert!(!opts.letter_spacing);
    }

    #[test]
    fn test_load_font() {
        assert!(OverlayConfig::default().load_font().is_ok());

        let config = OverlayConfig {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..Default::default()
        };
        assert!(matches!(config.load_font(), Err(LgtmError::Io(_))));
    }

    #[test]
    fn test_missing_fallback_font_is_an_error() {
        let config = OverlayConfig {
            fallback_fonts: vec![PathBuf::from("/nonexistent/cjk.otf")],
            ..Default::default()
        };
        assert!(matches!(config.load_font(), Err(LgtmError::Io(_))));
    }

    #[test]
    fn test_fallback_fonts_extend_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.ttf");
        std::fs::write(&path, crate::font::DEFAULT_FONT).unwrap();

        let config = OverlayConfig {
            fallback_fonts: vec![path.clone(), path],
            system_fallback: false,
            ..Default::default()
        };
        assert_eq!(config.load_font().unwrap().fallback_count(), 2);

        let plain = OverlayConfig {
            system_fallback: false,
            ..Default::default()
        };
        assert_eq!(plain.load_font().unwrap().fallback_count(), 0);
    }

    #[test]
    fn test_default_font_draws_kana_and_kanji() {
        if LayoutFont::system_cjk().is_none() {
            eprintln!("no system CJK font installed, skipping");
            return;
        }
        let font = OverlayConfig::default().load_font().unwrap();
        assert!(font.covers('あ'));
        assert!(font.covers('承'));
        assert!(font.covers('L'));
    }
}
