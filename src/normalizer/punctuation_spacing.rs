//! Punctuation spacing correction
//!
//! Ensures a single space follows `. , ; : ! ?` when the next character is
//! text, without touching spans where the mark is not sentence punctuation.
//!
//! A single ordered alternation classifies each span. Exclusions come first
//! and are passed through unchanged; only the final `mark` branch inserts a
//! space. Because the scan resumes after each consumed span, a mark inside
//! a URL, number, tag or entity can never be reached by the spacing branch.
//!
//! | kind       | example                         |
//! |------------|---------------------------------|
//! | `Numeric`  | `10.5`, `1,000`, `12-15`, `9:30` |
//! | `Url`      | `https://a.b/c,d`, `www.x.org`  |
//! | `Verbatim` | `<code>a.b</code>`, `<pre>…</pre>` |
//! | `Tag`      | `<a title="x,y">`               |
//! | `Entity`   | `&amp;`, `&#160;`               |
//! | `Ellipsis` | `...`                           |
//! | `Mark`     | `,` in `a,b`                    |

use std::ops::Range;
use std::sync::LazyLock;

use fancy_regex::{Captures, Regex};

use crate::config::NumericSeparatorTier;
use crate::normalizer::{COMMENT, TAG_BODY};

/// Classification of a span found by the spacing scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Separator between two digits
    Numeric,
    /// `http://`, `https://` or `www.` run
    Url,
    /// Contents of `<pre>` or `<code>` (tags included), or a comment
    Verbatim,
    /// Any other markup tag
    Tag,
    /// Named or numeric character reference
    Entity,
    /// Two or more consecutive periods
    Ellipsis,
    /// Punctuation mark directly followed by text; the only kind that is rewritten
    Mark,
}

impl SpanKind {
    #[must_use]
    pub fn is_exclusion(self) -> bool {
        !matches!(self, SpanKind::Mark)
    }
}

/// A classified span, as byte offsets into the scanned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSpan {
    pub kind: SpanKind,
    pub range: Range<usize>,
}

/// Capture group names in precedence order
const GROUPS: &[(&str, SpanKind)] = &[
    ("numeric", SpanKind::Numeric),
    ("url", SpanKind::Url),
    ("verbatim", SpanKind::Verbatim),
    ("tag", SpanKind::Tag),
    ("entity", SpanKind::Entity),
    ("ellipsis", SpanKind::Ellipsis),
    ("mark", SpanKind::Mark),
];

const SEPARATORS: &str = r"[.,:\-\x{2013}]";

/// Characters that may not directly follow a mark that gets a space
const NO_SPACE_BEFORE: &str = r#"\s<.,;:!?)\]}"'»”’"#;

fn build_pattern(tier: NumericSeparatorTier) -> String {
    // Whitespace, non-breaking space entities, or tags between digit and separator
    let markup_gap = format!(r"(?:\s|&nbsp;|&#160;|&#[xX][aA]0;|<{TAG_BODY}>)*");
    let numeric = match tier {
        NumericSeparatorTier::Adjacent => format!(r"(?<=[0-9]){SEPARATORS}(?=[0-9])"),
        NumericSeparatorTier::Spaced => format!(r"(?<=[0-9])\s*{SEPARATORS}\s*(?=[0-9])"),
        NumericSeparatorTier::Markup => {
            format!(r"(?<=[0-9]){markup_gap}{SEPARATORS}{markup_gap}(?=[0-9])")
        }
    };

    [
        format!("(?P<numeric>{numeric})"),
        r#"(?P<url>(?i:https?://|www\.)[^\s<>"']+)"#.to_string(),
        format!(
            r"(?P<verbatim>{COMMENT}|(?i:<pre\b{TAG_BODY}>[\s\S]*?</pre\s*>|<code\b{TAG_BODY}>[\s\S]*?</code\s*>))"
        ),
        format!("(?P<tag><{TAG_BODY}>)"),
        r"(?P<entity>&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);)".to_string(),
        r"(?P<ellipsis>\.{2,})".to_string(),
        // Followed by text, an opening tag other than `<br>`, or an opening quote
        format!(
            r#"(?P<mark>[.,;:!?])(?=[^{NO_SPACE_BEFORE}]|<(?![/!]|(?i:br)\b)|["'][^{NO_SPACE_BEFORE}])(?!&nbsp;|&#160;)"#
        ),
    ]
    .join("|")
}

static ADJACENT_SPACING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&build_pattern(NumericSeparatorTier::Adjacent))
        .expect("ADJACENT_SPACING: hardcoded regex is valid")
});

static SPACED_SPACING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&build_pattern(NumericSeparatorTier::Spaced))
        .expect("SPACED_SPACING: hardcoded regex is valid")
});

static MARKUP_SPACING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&build_pattern(NumericSeparatorTier::Markup))
        .expect("MARKUP_SPACING: hardcoded regex is valid")
});

fn spacing_regex(tier: NumericSeparatorTier) -> &'static Regex {
    match tier {
        NumericSeparatorTier::Adjacent => &ADJACENT_SPACING,
        NumericSeparatorTier::Spaced => &SPACED_SPACING,
        NumericSeparatorTier::Markup => &MARKUP_SPACING,
    }
}

#[inline]
fn has_spacing_mark(text: &str) -> bool {
    text.contains(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'))
}

fn classify(caps: &Captures<'_>) -> Option<ClassifiedSpan> {
    GROUPS.iter().find_map(|(name, kind)| {
        caps.name(name).map(|m| ClassifiedSpan {
            kind: *kind,
            range: m.start()..m.end(),
        })
    })
}

/// Classify every exclusion and spacing candidate in `text`.
///
/// Spans are returned in order and never overlap. If the regex engine
/// hits its backtracking limit, the spans found so far are returned.
#[must_use]
pub fn classify_spans(text: &str, tier: NumericSeparatorTier) -> Vec<ClassifiedSpan> {
    let mut spans = Vec::new();
    for caps in spacing_regex(tier).captures_iter(text) {
        match caps {
            Ok(caps) => spans.extend(classify(&caps)),
            Err(e) => {
                tracing::warn!("Span classification stopped early: {}", e);
                break;
            }
        }
    }
    spans
}

/// Fix punctuation spacing with the default (`Markup`) numeric tier.
///
/// # Example
/// ```rust
/// # use kodegen_tools_richtext::normalizer::punctuation_spacing::fix_punctuation_spacing;
/// assert_eq!(fix_punctuation_spacing("Hello,world.Bye"), "Hello, world. Bye");
/// assert_eq!(fix_punctuation_spacing("Pi is 3.14"), "Pi is 3.14");
/// ```
#[must_use]
pub fn fix_punctuation_spacing(text: &str) -> String {
    fix_punctuation_spacing_with(text, NumericSeparatorTier::default())
}

/// Fix punctuation spacing with an explicit numeric tier.
///
/// Idempotent: a second pass finds every mark already followed by a space.
#[must_use]
pub fn fix_punctuation_spacing_with(text: &str, tier: NumericSeparatorTier) -> String {
    if !has_spacing_mark(text) {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len() + text.len() / 16);
    let mut last = 0;
    let mut inserted = 0usize;

    for span in classify_spans(text, tier) {
        if span.kind.is_exclusion() {
            continue;
        }
        output.push_str(&text[last..span.range.end]);
        output.push(' ');
        last = span.range.end;
        inserted += 1;
    }
    output.push_str(&text[last..]);

    if inserted > 0 {
        tracing::debug!("Inserted {} spaces after punctuation", inserted);
    }
    output
}
