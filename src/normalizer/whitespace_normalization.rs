//! Line-ending and whitespace normalization for HTML fragments.
//!
//! Collapses runs of horizontal whitespace outside of tags to a single
//! space while keeping newlines, so the line-break formatter that runs
//! afterwards still sees the author's line structure. Markup and the
//! contents of `<pre>` blocks are passed through untouched. Non-breaking
//! spaces (U+00A0) are intentional and never collapsed.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::normalizer::{COMMENT, TAG_BODY};

static WHITESPACE_OUTSIDE_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<verbatim>{COMMENT}|(?is:<pre\b{TAG_BODY}>.*?</pre\s*>))|(?P<tag><{TAG_BODY}>)|(?P<newline>[^\S\n\x{{A0}}]*\n[^\S\n\x{{A0}}]*)|(?P<space>[^\S\n\x{{A0}}]+)"
    ))
    .expect("WHITESPACE_OUTSIDE_TAGS: hardcoded regex is valid")
});

/// Convert CRLF and lone CR line endings to LF
///
/// # Example
/// ```rust
/// # use kodegen_tools_richtext::normalizer::whitespace_normalization::normalize_line_endings;
/// assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
/// ```
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Collapse whitespace runs outside tags.
///
/// - horizontal runs become one space
/// - a newline with horizontal whitespace around it becomes a bare newline
/// - tags, comments and `<pre>` blocks are untouched
#[must_use]
pub fn collapse_whitespace(html: &str) -> String {
    WHITESPACE_OUTSIDE_TAGS
        .replace_all(html, |caps: &Captures| {
            if caps.name("newline").is_some() {
                Cow::Borrowed("\n")
            } else if caps.name("space").is_some() {
                Cow::Borrowed(" ")
            } else {
                Cow::Owned(caps[0].to_string())
            }
        })
        .into_owned()
}
