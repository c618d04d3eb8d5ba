//! Fluent builder for `NormalizerConfig`
//!
//! Every setter is optional; `build()` starts from `NormalizerConfig::default()`
//! and validates the name lists before handing back an immutable config.

use super::types::{LineBreakMode, NormalizerConfig, NumericSeparatorTier};
use crate::error::NormalizeResult;

#[derive(Debug, Clone, Default)]
pub struct NormalizerConfigBuilder {
    pub(crate) config: NormalizerConfig,
}

impl NormalizerConfig {
    /// Create a builder for configuring a `NormalizerConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> NormalizerConfigBuilder {
        NormalizerConfigBuilder::default()
    }
}

impl NormalizerConfigBuilder {
    #[must_use]
    pub fn preserve_line_breaks(mut self, preserve: bool) -> Self {
        self.config.preserve_line_breaks = preserve;
        self
    }

    /// Set the line-break mode.
    ///
    /// Accepts either a `LineBreakMode` or a mode name; unknown names fall
    /// back to `LineBreakMode::Preserve`.
    ///
    /// ```rust
    /// # use kodegen_tools_richtext::config::{LineBreakMode, NormalizerConfig};
    /// let config = NormalizerConfig::builder()
    ///     .preserve_line_breaks(false)
    ///     .line_break_mode("list")
    ///     .build()?;
    /// assert_eq!(config.effective_line_break_mode(), LineBreakMode::List);
    /// # Ok::<(), kodegen_tools_richtext::NormalizeError>(())
    /// ```
    #[must_use]
    pub fn line_break_mode(mut self, mode: impl Into<LineBreakMode>) -> Self {
        self.config.line_break_mode = mode.into();
        self
    }

    #[must_use]
    pub fn keep_emoji(mut self, keep: bool) -> Self {
        self.config.keep_emoji = keep;
        self
    }

    /// Replace the exact-name attribute strip list
    #[must_use]
    pub fn attribute_strip_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.attribute_strip_list = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the attribute prefix rules (`data-`, `aria-` by default)
    #[must_use]
    pub fn attribute_strip_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.attribute_strip_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn block_elements<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.block_elements = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn carry_over_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.carry_over_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn numeric_separator_tier(mut self, tier: NumericSeparatorTier) -> Self {
        self.config.numeric_separator_tier = tier;
        self
    }

    #[must_use]
    pub fn fix_punctuation(mut self, fix: bool) -> Self {
        self.config.fix_punctuation = fix;
        self
    }

    /// Validate and build the configuration.
    ///
    /// Tag and attribute names are lowercased, since the HTML parser
    /// lowercases them before the normalizer ever compares against them.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::Config` if any list contains an empty name.
    pub fn build(self) -> NormalizeResult<NormalizerConfig> {
        let mut config = self.config;
        config.normalize_names();
        config.validate()?;
        Ok(config)
    }
}
