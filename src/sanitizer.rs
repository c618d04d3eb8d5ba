//! The external sanitizer seam
//!
//! The normalizer never filters tags or attributes against a policy itself.
//! It hands its intermediate HTML to whatever allow-list sanitizer the host
//! uses, through one of these traits, and propagates the outcome.

use std::collections::HashSet;
use std::future::Future;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::NormalizeResult;
use crate::normalizer::TAG_BODY;

/// Synchronous allow-list sanitizer
pub trait HtmlSanitizer {
    /// Filter `html` down to the allowed vocabulary.
    ///
    /// # Errors
    ///
    /// Implementations return `NormalizeError::Sanitizer` when they reject
    /// the input; the pipeline propagates it unchanged.
    fn sanitize(&self, html: &str) -> NormalizeResult<String>;
}

/// Sanitizer that may suspend (remote policy service, worker pool, ...)
pub trait AsyncHtmlSanitizer: Send + Sync {
    fn sanitize_async(&self, html: String)
    -> impl Future<Output = NormalizeResult<String>> + Send;
}

impl<T> AsyncHtmlSanitizer for T
where
    T: HtmlSanitizer + Send + Sync,
{
    fn sanitize_async(
        &self,
        html: String,
    ) -> impl Future<Output = NormalizeResult<String>> + Send {
        std::future::ready(self.sanitize(&html))
    }
}

/// Returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSanitizer;

impl HtmlSanitizer for PassthroughSanitizer {
    fn sanitize(&self, html: &str) -> NormalizeResult<String> {
        Ok(html.to_string())
    }
}

/// Tags `EscapingSanitizer` lets through by default
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "em", "i", "li", "ol", "p", "pre", "strong", "u", "ul",
];

static ELEMENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"<(?P<close>/)?(?P<name>[a-zA-Z][a-zA-Z0-9]*)\b{TAG_BODY}>"
    ))
    .expect("ELEMENT_TAG: hardcoded regex is valid")
});

/// Minimal allow-list sanitizer: any element tag outside the allow list is
/// escaped so it renders as text. Attributes are not inspected.
#[derive(Debug, Clone)]
pub struct EscapingSanitizer {
    allowed_tags: HashSet<String>,
}

impl Default for EscapingSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_TAGS.iter().copied())
    }
}

impl EscapingSanitizer {
    pub fn new<I, S>(allowed_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_tags: allowed_tags
                .into_iter()
                .map(|tag| tag.into().to_ascii_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn allows(&self, tag: &str) -> bool {
        self.allowed_tags.contains(&tag.to_ascii_lowercase())
    }
}

impl HtmlSanitizer for EscapingSanitizer {
    fn sanitize(&self, html: &str) -> NormalizeResult<String> {
        let mut escaped = 0usize;
        let result = ELEMENT_TAG.replace_all(html, |caps: &Captures| {
            let tag = &caps[0];
            if self.allows(&caps["name"]) {
                tag.to_string()
            } else {
                escaped += 1;
                html_escape::encode_text(tag).into_owned()
            }
        });

        if escaped > 0 {
            tracing::debug!("Escaped {} disallowed tags", escaped);
        }
        Ok(result.into_owned())
    }
}
