//! Rich-text normalization pipeline
//!
//! Stages run in a fixed order:
//!
//! 1. emoji extraction (optional)
//! 2. line-ending normalization
//! 3. container normalization
//! 4. external sanitizer
//! 5. punctuation spacing (optional)
//! 6. whitespace collapse
//! 7. line-break formatting (optional)
//! 8. emoji restoration
//! 9. trim
//!
//! Stages 1–3 are [`RichTextNormalizer::prepare`], stages 5–9 are
//! [`RichTextNormalizer::finish`]. The [`EmojiMap`] travels inside
//! [`PreparedHtml`] between the two, so a normalizer holds no per-call state
//! and can be shared freely across tasks.

pub mod container_normalization;
pub mod emoji_vault;
pub mod line_break_formatting;
pub mod punctuation_spacing;
pub mod whitespace_normalization;

use std::sync::Arc;

use crate::config::NormalizerConfig;
use crate::error::NormalizeResult;
use crate::sanitizer::{AsyncHtmlSanitizer, HtmlSanitizer};

pub use container_normalization::{ContainerRules, normalize_containers, normalize_containers_with};
pub use emoji_vault::{EmojiEntry, EmojiMap, extract, extract_with_ranges, restore};
pub use line_break_formatting::apply_line_breaks;
pub use punctuation_spacing::{fix_punctuation_spacing, fix_punctuation_spacing_with};
pub use whitespace_normalization::{collapse_whitespace, normalize_line_endings};

/// Inside of a start or end tag. Quoted attribute values may hold `<` or
/// `>`, which the serializer leaves unescaped.
pub(crate) const TAG_BODY: &str = r#"(?:[^<>"']|"[^"]*"|'[^']*')*"#;

/// An HTML comment, which may itself contain `<`, `>` or quotes
pub(crate) const COMMENT: &str = r"<!--[\s\S]*?-->";

/// Output of the pre-sanitizer half of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedHtml {
    html: String,
    emoji: EmojiMap,
}

impl PreparedHtml {
    /// HTML to hand to the sanitizer
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn emoji(&self) -> &EmojiMap {
        &self.emoji
    }
}

/// A configured normalization pipeline
#[derive(Debug, Clone)]
pub struct RichTextNormalizer {
    config: NormalizerConfig,
    rules: ContainerRules,
}

impl Default for RichTextNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl RichTextNormalizer {
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        let rules = ContainerRules::from(&config);
        Self { config, rules }
    }

    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Run the full pipeline with a synchronous sanitizer.
    ///
    /// Blank input returns an empty string without calling the sanitizer.
    ///
    /// # Example
    /// ```rust
    /// # use kodegen_tools_richtext::{PassthroughSanitizer, RichTextNormalizer};
    /// let normalizer = RichTextNormalizer::default();
    /// let html = normalizer.normalize("<div class=\"x\">Hi,there 👋</div>", &PassthroughSanitizer)?;
    /// assert_eq!(html, "<p>Hi, there 👋</p>");
    /// # Ok::<(), kodegen_tools_richtext::NormalizeError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Only the sanitizer can fail; its error is returned unchanged.
    pub fn normalize<S>(&self, html: &str, sanitizer: &S) -> NormalizeResult<String>
    where
        S: HtmlSanitizer + ?Sized,
    {
        let Some(prepared) = self.prepare(html) else {
            return Ok(String::new());
        };
        let sanitized = sanitizer.sanitize(prepared.html())?;
        tracing::debug!("Sanitizer returned {} bytes", sanitized.len());
        Ok(self.finish(prepared, &sanitized))
    }

    /// Run the full pipeline with a sanitizer that may suspend.
    ///
    /// # Errors
    ///
    /// Only the sanitizer can fail; its error is returned unchanged.
    pub async fn normalize_async<S>(&self, html: &str, sanitizer: &S) -> NormalizeResult<String>
    where
        S: AsyncHtmlSanitizer + ?Sized,
    {
        let Some(prepared) = self.prepare(html) else {
            return Ok(String::new());
        };
        let sanitized = sanitizer.sanitize_async(prepared.html.clone()).await?;
        tracing::debug!("Async sanitizer returned {} bytes", sanitized.len());
        Ok(self.finish(prepared, &sanitized))
    }

    /// Run the synchronous pipeline on tokio's blocking pool.
    ///
    /// For hosts on an async runtime whose sanitizer is synchronous and
    /// expensive on large documents.
    ///
    /// # Errors
    ///
    /// Returns the sanitizer's error, or `NormalizeError::TaskJoin` if the
    /// blocking task panicked.
    pub async fn normalize_blocking<S>(
        &self,
        html: &str,
        sanitizer: Arc<S>,
    ) -> NormalizeResult<String>
    where
        S: HtmlSanitizer + Send + Sync + 'static,
    {
        let html = Arc::<str>::from(html);
        let normalizer = self.clone();

        tokio::task::spawn_blocking(move || normalizer.normalize(&html, sanitizer.as_ref())).await?
    }

    /// Pre-sanitizer stages: emoji extraction, line endings, containers.
    ///
    /// Returns `None` for empty or all-whitespace input.
    #[must_use]
    pub fn prepare(&self, html: &str) -> Option<PreparedHtml> {
        if html.trim().is_empty() {
            tracing::debug!("Blank input, skipping normalization");
            return None;
        }

        let (protected, emoji) = if self.config.keep_emoji() {
            extract(html)
        } else {
            (html.to_string(), EmojiMap::new())
        };

        let unified = normalize_line_endings(&protected);
        let html = normalize_containers_with(&unified, &self.rules);
        tracing::debug!(
            "Prepared {} bytes ({} vaulted) for sanitizing",
            html.len(),
            emoji.len()
        );

        Some(PreparedHtml { html, emoji })
    }

    /// Post-sanitizer stages, consuming the vault from [`Self::prepare`].
    #[must_use]
    pub fn finish(&self, prepared: PreparedHtml, sanitized: &str) -> String {
        let spaced = if self.config.fix_punctuation() {
            fix_punctuation_spacing_with(sanitized, self.config.numeric_separator_tier())
        } else {
            sanitized.to_string()
        };

        let collapsed = collapse_whitespace(&spaced);

        let mode = self.config.effective_line_break_mode();
        let formatted = apply_line_breaks(&collapsed, mode);
        tracing::debug!("Applied line break mode '{}'", mode);

        let restored = restore(&formatted, &prepared.emoji);
        restored.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineBreakMode;
    use crate::error::NormalizeError;
    use crate::sanitizer::{EscapingSanitizer, PassthroughSanitizer};

    struct RejectingSanitizer;

    impl HtmlSanitizer for RejectingSanitizer {
        fn sanitize(&self, _html: &str) -> NormalizeResult<String> {
            Err(NormalizeError::Sanitizer("rejected".to_string()))
        }
    }

    fn normalizer_with(mode: LineBreakMode) -> RichTextNormalizer {
        let config = NormalizerConfig::builder()
            .preserve_line_breaks(false)
            .line_break_mode(mode)
            .build()
            .expect("valid config");
        RichTextNormalizer::new(config)
    }

    #[test]
    fn test_blank_input_short_circuits() {
        let normalizer = RichTextNormalizer::default();
        // The rejecting sanitizer proves the pipeline was never entered
        assert_eq!(
            normalizer.normalize("  \r\n\t ", &RejectingSanitizer).expect("blank"),
            ""
        );
        assert!(normalizer.prepare("").is_none());
    }

    #[test]
    fn test_sanitizer_error_propagates() {
        let err = RichTextNormalizer::default()
            .normalize("<p>x</p>", &RejectingSanitizer)
            .expect_err("sanitizer rejects");
        assert!(err.is_sanitizer_failure());
    }

    #[test]
    fn test_div_and_span_restructuring() {
        let normalizer = RichTextNormalizer::default();
        assert_eq!(
            normalizer
                .normalize("<div>A<div>B</div></div>", &PassthroughSanitizer)
                .expect("normalize"),
            "A<p>B</p>"
        );
        assert_eq!(
            normalizer
                .normalize("<span class=x>hi</span> there", &PassthroughSanitizer)
                .expect("normalize"),
            "hi there"
        );
    }

    #[test]
    fn test_crlf_and_whitespace_are_collapsed() {
        let result = RichTextNormalizer::default()
            .normalize("  <p>a  \r\n  b</p>  ", &PassthroughSanitizer)
            .expect("normalize");
        assert_eq!(result, "<p>a\nb</p>");
    }

    #[test]
    fn test_emoji_survive_pipeline() {
        let result = RichTextNormalizer::default()
            .normalize("<span>Great job!🎉</span>", &PassthroughSanitizer)
            .expect("normalize");
        assert_eq!(result, "Great job! 🎉");
    }

    #[test]
    fn test_keep_emoji_false_still_keeps_text() {
        let config = NormalizerConfig::builder()
            .keep_emoji(false)
            .build()
            .expect("valid config");
        let result = RichTextNormalizer::new(config)
            .normalize("ok 👍", &PassthroughSanitizer)
            .expect("normalize");
        assert_eq!(result, "ok 👍");
    }

    #[test]
    fn test_punctuation_can_be_disabled() {
        let config = NormalizerConfig::builder()
            .fix_punctuation(false)
            .build()
            .expect("valid config");
        let result = RichTextNormalizer::new(config)
            .normalize("a,b", &PassthroughSanitizer)
            .expect("normalize");
        assert_eq!(result, "a,b");
    }

    #[test]
    fn test_list_mode_renders_escaped_items() {
        let sanitizer = EscapingSanitizer::new(["p", "ul", "li"]);
        let result = normalizer_with(LineBreakMode::List)
            .normalize("A\n<b>B</b>\n", &sanitizer)
            .expect("normalize");
        assert_eq!(result, "<ul><li>A</li><li>&lt;b&gt;B&lt;/b&gt;</li></ul>");
    }

    #[test]
    fn test_paragraph_mode_keeps_existing_blocks() {
        let result = normalizer_with(LineBreakMode::Paragraphs)
            .normalize("first\n\n<ul><li>x</li></ul>", &PassthroughSanitizer)
            .expect("normalize");
        assert_eq!(result, "<p>first</p>\n<ul><li>x</li></ul>");
    }

    #[test]
    fn test_preserve_line_breaks_overrides_mode() {
        let config = NormalizerConfig::builder()
            .line_break_mode(LineBreakMode::Strip)
            .build()
            .expect("valid config");
        let result = RichTextNormalizer::new(config)
            .normalize("a\nb", &PassthroughSanitizer)
            .expect("normalize");
        assert_eq!(result, "a\nb");
    }

    #[test]
    fn test_pipeline_is_idempotent_on_its_output() {
        let normalizer = normalizer_with(LineBreakMode::Paragraphs);
        let input = "<div class=\"x\">Hello,world.See https://a.b/c,d 😀</div>\n\nNext line.";
        let once = normalizer.normalize(input, &PassthroughSanitizer).expect("once");
        let twice = normalizer.normalize(&once, &PassthroughSanitizer).expect("twice");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_prepare_and_finish_thread_the_vault() {
        let normalizer = RichTextNormalizer::default();
        let prepared = normalizer.prepare("<p>🚀 go</p>").expect("non-blank");
        assert_eq!(prepared.html(), "<p>###EMOJI_0### go</p>");
        assert_eq!(prepared.emoji().len(), 1);
        let sanitized = prepared.html().to_string();
        assert_eq!(normalizer.finish(prepared, &sanitized), "<p>🚀 go</p>");
    }

    #[tokio::test]
    async fn test_async_and_blocking_match_sync() {
        let normalizer = RichTextNormalizer::default();
        let input = "<div>One,two 🙂</div>";
        let sync = normalizer
            .normalize(input, &PassthroughSanitizer)
            .expect("sync");
        let async_result = normalizer
            .normalize_async(input, &PassthroughSanitizer)
            .await
            .expect("async");
        let blocking = normalizer
            .normalize_blocking(input, Arc::new(PassthroughSanitizer))
            .await
            .expect("blocking");
        assert_eq!(sync, "<p>One, two 🙂</p>");
        assert_eq!(async_result, sync);
        assert_eq!(blocking, sync);
    }
}
