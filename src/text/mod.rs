//! # Text Items
//!
//! The two lines drawn on an image, their colors, and the string transforms
//! applied before layout:
//!
//! - **Letter spacing**: `"LGTM"` is drawn as `"L G T M"`.
//! - **Script detection**: text containing Japanese kana or CJK ideographs
//!   renders wider per character, which the heuristic size strategy
//!   compensates for.

use image::Rgba;
use serde::Serialize;

/// Default headline.
pub const DEFAULT_PRIMARY_TEXT: &str = "LGTM";

/// Default caption.
pub const DEFAULT_SECONDARY_TEXT: &str = "Looks Good To Me";

/// Which of the two lines a text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Large headline.
    Primary,
    /// Smaller caption drawn below the headline.
    Secondary,
}

impl Role {
    /// Placeholder text for this role.
    pub fn default_text(self) -> &'static str {
        match self {
            Role::Primary => DEFAULT_PRIMARY_TEXT,
            Role::Secondary => DEFAULT_SECONDARY_TEXT,
        }
    }
}

/// Text color. Only two are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TextColor {
    /// White text, for dark images.
    #[default]
    #[value(name = "white")]
    Light,
    /// Black text, for light images.
    #[value(name = "black")]
    Dark,
}

impl TextColor {
    pub fn rgba(self) -> Rgba<u8> {
        match self {
            TextColor::Light => Rgba([255, 255, 255, 255]),
            TextColor::Dark => Rgba([0, 0, 0, 255]),
        }
    }
}

/// One line of text to draw.
///
/// ## Example
///
/// ```
/// use lgtm::text::{Role, TextColor, TextItem};
///
/// let item = TextItem::new("LGTM", Role::Primary, TextColor::Light);
/// assert_eq!(item.rendered(true), "L G T M");
/// assert_eq!(item.rendered(false), "LGTM");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    content: String,
    role: Role,
    color: TextColor,
}

impl TextItem {
    pub fn new(content: impl Into<String>, role: Role, color: TextColor) -> Self {
        Self {
            content: content.into(),
            role,
            color,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn color(&self) -> TextColor {
        self.color
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The string that is actually measured and drawn.
    pub fn rendered(&self, letter_spacing: bool) -> String {
        if letter_spacing {
            spaced(&self.content)
        } else {
            self.content.clone()
        }
    }
}

/// Insert one space between every pair of consecutive characters.
///
/// Existing spaces are treated like any other character, so word gaps
/// become three spaces wide.
///
/// ```
/// use lgtm::text::spaced;
///
/// assert_eq!(spaced("Looks Good"), "L o o k s   G o o d");
/// ```
pub fn spaced(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// True if any character is Hiragana, Katakana or a CJK ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{31F0}'..='\u{31FF}' // Katakana phonetic extensions
        | '\u{FF66}'..='\u{FF9F}' // Halfwidth katakana
        | '\u{3005}' | '\u{3007}' // Iteration mark, ideographic zero
        | '\u{3400}'..='\u{4DBF}' // Extension A
        | '\u{4E00}'..='\u{9FFF}' // Unified ideographs
        | '\u{F900}'..='\u{FAFF}' // Compatibility ideographs
        | '\u{20000}'..='\u{2FA1F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_ascii() {
        assert_eq!(spaced("LGTM"), "L G T M");
    }

    #[test]
    fn test_spaced_keeps_existing_spaces() {
        assert_eq!(spaced("Looks Good To Me"), "L o o k s   G o o d   T o   M e");
    }

    #[test]
    fn test_spaced_edge_cases() {
        assert_eq!(spaced(""), "");
        assert_eq!(spaced("A"), "A");
        assert_eq!(spaced("あいう"), "あ い う");
    }

    #[test]
    fn test_contains_cjk() {
        assert!(!contains_cjk("LGTM"));
        assert!(contains_cjk("ABCあいう"));
        assert!(contains_cjk("あいう"));
        assert!(contains_cjk("カタカナ"));
        assert!(contains_cjk("承認"));
        assert!(!contains_cjk(""));
    }

    #[test]
    fn test_contains_cjk_scans_whole_string() {
        // CJK only at the end
        assert!(contains_cjk("LGTM です"));
        assert!(contains_cjk("Looks good 👍 良い"));
        assert!(!contains_cjk("Looks good 👍"));
    }

    #[test]
    fn test_text_item_rendered() {
        let item = TextItem::new("Looks Good To Me", Role::Secondary, TextColor::Dark);
        assert_eq!(item.rendered(false), "Looks Good To Me");
        assert_eq!(item.rendered(true).chars().count(), 31);
        assert_eq!(item.color().rgba(), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_role_defaults() {
        assert_eq!(Role::Primary.default_text(), "LGTM");
        assert_eq!(Role::Secondary.default_text(), "Looks Good To Me");
    }
}
