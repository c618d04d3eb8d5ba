//! Getter methods for `NormalizerConfig`

use super::types::{LineBreakMode, NormalizerConfig, NumericSeparatorTier};

impl NormalizerConfig {
    #[must_use]
    pub fn preserve_line_breaks(&self) -> bool {
        self.preserve_line_breaks
    }

    /// Configured mode, before `preserve_line_breaks` is taken into account
    #[must_use]
    pub fn line_break_mode(&self) -> LineBreakMode {
        self.line_break_mode
    }

    #[must_use]
    pub fn keep_emoji(&self) -> bool {
        self.keep_emoji
    }

    #[must_use]
    pub fn attribute_strip_list(&self) -> &[String] {
        &self.attribute_strip_list
    }

    #[must_use]
    pub fn attribute_strip_prefixes(&self) -> &[String] {
        &self.attribute_strip_prefixes
    }

    #[must_use]
    pub fn block_elements(&self) -> &[String] {
        &self.block_elements
    }

    #[must_use]
    pub fn carry_over_attributes(&self) -> &[String] {
        &self.carry_over_attributes
    }

    #[must_use]
    pub fn numeric_separator_tier(&self) -> NumericSeparatorTier {
        self.numeric_separator_tier
    }

    #[must_use]
    pub fn fix_punctuation(&self) -> bool {
        self.fix_punctuation
    }
}
