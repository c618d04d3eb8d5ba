//! Core configuration types for rich-text normalization
//!
//! This module contains the `NormalizerConfig` struct and the small enums it
//! is built from. A config is immutable once handed to a
//! `RichTextNormalizer`; nothing in the pipeline writes back to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute names removed from every element by default
pub const DEFAULT_ATTRIBUTE_STRIP_LIST: &[&str] = &[
    "class",
    "style",
    "id",
    "dir",
    "role",
    "tabindex",
    "contenteditable",
    "spellcheck",
    "attributionsrc",
];

/// Attribute name prefixes removed from every element by default
pub const DEFAULT_ATTRIBUTE_STRIP_PREFIXES: &[&str] = &["data-", "aria-"];

/// Tags that make a `div` count as "already block-structured"
pub const DEFAULT_BLOCK_ELEMENTS: &[&str] = &["p", "div", "ul", "ol", "table", "tr", "td", "th"];

/// How line breaks are treated once the HTML has been normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineBreakMode {
    /// Leave line breaks untouched
    Preserve,
    /// Replace every line break with a single space
    Strip,
    /// Split on blank lines and wrap each block in `<p>`
    #[default]
    Paragraphs,
    /// Render each non-empty line as a `<li>` in one `<ul>`
    List,
}

impl LineBreakMode {
    /// Parse a mode name, falling back to `Preserve` for anything unknown.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// An unrecognized mode never reshapes content.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "preserve" => LineBreakMode::Preserve,
            "strip" => LineBreakMode::Strip,
            "paragraphs" => LineBreakMode::Paragraphs,
            "list" => LineBreakMode::List,
            other => {
                tracing::warn!(
                    "Unknown line break mode '{}', falling back to preserve",
                    other
                );
                LineBreakMode::Preserve
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreakMode::Preserve => "preserve",
            LineBreakMode::Strip => "strip",
            LineBreakMode::Paragraphs => "paragraphs",
            LineBreakMode::List => "list",
        }
    }
}

impl From<String> for LineBreakMode {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

impl From<&str> for LineBreakMode {
    fn from(value: &str) -> Self {
        Self::parse_lossy(value)
    }
}

impl From<LineBreakMode> for String {
    fn from(mode: LineBreakMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for LineBreakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much may sit between two digits and a separator before the
/// separator stops counting as part of a number.
///
/// Each tier is a superset of the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericSeparatorTier {
    /// `10.5`, `1,000`, `12-15`
    Adjacent,
    /// Also `10 . 5`, `12 - 15`
    Spaced,
    /// Also `10&nbsp;-&nbsp;15`, `1<b>,</b>000`
    #[default]
    Markup,
}

/// Main configuration struct for rich-text normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Skip line-break formatting entirely (default: true)
    pub(crate) preserve_line_breaks: bool,

    /// Mode applied when `preserve_line_breaks` is false
    pub(crate) line_break_mode: LineBreakMode,

    /// Protect emoji from the text transforms (default: true)
    pub(crate) keep_emoji: bool,

    /// Exact attribute names stripped from every element
    pub(crate) attribute_strip_list: Vec<String>,

    /// Attribute name prefixes stripped from every element
    pub(crate) attribute_strip_prefixes: Vec<String>,

    /// Direct-child tags that make a `div` unwrap instead of becoming `<p>`
    pub(crate) block_elements: Vec<String>,

    /// Attributes a `div` hands to the `<p>` that replaces it.
    ///
    /// Empty by default. Carried attributes still go through stripping.
    pub(crate) carry_over_attributes: Vec<String>,

    pub(crate) numeric_separator_tier: NumericSeparatorTier,

    /// Run punctuation spacing (default: true)
    pub(crate) fix_punctuation: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            preserve_line_breaks: true,
            line_break_mode: LineBreakMode::default(),
            keep_emoji: true,
            attribute_strip_list: to_owned_list(DEFAULT_ATTRIBUTE_STRIP_LIST),
            attribute_strip_prefixes: to_owned_list(DEFAULT_ATTRIBUTE_STRIP_PREFIXES),
            block_elements: to_owned_list(DEFAULT_BLOCK_ELEMENTS),
            carry_over_attributes: Vec::new(),
            numeric_separator_tier: NumericSeparatorTier::default(),
            fix_punctuation: true,
        }
    }
}

pub(crate) fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
