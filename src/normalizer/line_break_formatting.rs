//! Line-break formatting
//!
//! Reshapes line structure once the HTML has been normalized:
//! - `Strip`: every line break (raw newline or `<br>`) becomes one space
//! - `Paragraphs`: blank-line separated text is wrapped in `<p>`; block
//!   elements are kept as they are and only the inline runs around them
//!   are wrapped, so a `<p>` never ends up holding a block
//! - `List`: every non-empty line becomes an escaped `<li>` in one `<ul>`
//! - `Preserve`: no change
//!
//! A `<br>` directly followed by a newline counts as a single break, since
//! editors commonly emit both for one visual line break.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::LineBreakMode;
use crate::normalizer::{COMMENT, TAG_BODY};

/// Tags that mark a paragraph-mode block as already structured
pub const PARAGRAPH_BLOCK_TAGS: &[&str] = &["p", "ul", "ol", "li", "table", "tr", "td", "th"];

/// Other elements a `<p>` cannot contain; kept out of paragraphs the same way
const NON_PHRASING_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav",
    "pre", "section",
];

/// Non-phrasing elements without content
const VOID_BLOCK_TAGS: &[&str] = &["hr"];

/// One line break, with any horizontal whitespace around it
static SINGLE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\S\n]*(?:(?i:<br\s*/?>)[^\S\n]*\n?|\n)[^\S\n]*")
        .expect("SINGLE_BREAK: hardcoded regex is valid")
});

/// A run of one or more line breaks
static BREAK_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[^\S\n]*(?:(?i:<br\s*/?>)[^\S\n]*\n?|\n))+[^\S\n]*")
        .expect("BREAK_RUN: hardcoded regex is valid")
});

/// Two or more consecutive line breaks: a paragraph boundary
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[^\S\n]*(?:(?i:<br\s*/?>)[^\S\n]*\n?|\n)){2,}[^\S\n]*")
        .expect("BLANK_LINE: hardcoded regex is valid")
});

/// Comments and start/end tags, with the tag name captured
static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{COMMENT}|<(?P<close>/)?(?P<name>[a-zA-Z][a-zA-Z0-9]*){TAG_BODY}>"
    ))
    .expect("TAG_TOKEN: hardcoded regex is valid")
});

/// `<br>` and block tag boundaries, each of which ends a list line
static LINE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)<br\s*/?>|</?(?:p|div|li|ul|ol|table|tr|td|th|blockquote|pre)\b{TAG_BODY}>"
    ))
    .expect("LINE_BOUNDARY: hardcoded regex is valid")
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{COMMENT}|<{TAG_BODY}>")).expect("ANY_TAG: hardcoded regex is valid")
});

/// Apply a line-break mode to normalized HTML.
///
/// # Example
/// ```rust
/// # use kodegen_tools_richtext::config::LineBreakMode;
/// # use kodegen_tools_richtext::normalizer::line_break_formatting::apply_line_breaks;
/// assert_eq!(apply_line_breaks("a\nb<br>c", LineBreakMode::Strip), "a b c");
/// assert_eq!(
///     apply_line_breaks("one\ntwo\n\nthree", LineBreakMode::Paragraphs),
///     "<p>one two</p>\n<p>three</p>"
/// );
/// ```
#[must_use]
pub fn apply_line_breaks(html: &str, mode: LineBreakMode) -> String {
    match mode {
        LineBreakMode::Preserve => html.to_string(),
        LineBreakMode::Strip => strip_line_breaks(html),
        LineBreakMode::Paragraphs => wrap_paragraphs(html),
        LineBreakMode::List => render_list(html),
    }
}

fn strip_line_breaks(html: &str) -> String {
    BREAK_RUN.replace_all(html, " ").into_owned()
}

/// Top-level block elements are kept verbatim, blank lines inside them
/// included. The inline runs between them are split on blank lines and
/// each piece is wrapped in `<p>`.
fn wrap_paragraphs(html: &str) -> String {
    let mut segments = Vec::new();
    split_blocks(html, &mut segments);

    tracing::debug!("Paragraph mode produced {} segments", segments.len());
    segments.join("\n")
}

#[inline]
fn is_block_tag(name: &str) -> bool {
    PARAGRAPH_BLOCK_TAGS
        .iter()
        .chain(NON_PHRASING_TAGS)
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

fn split_blocks(html: &str, segments: &mut Vec<String>) {
    let mut cursor = 0;
    let mut depth = 0usize;
    let mut block_start = 0;

    for caps in TAG_TOKEN.captures_iter(html) {
        let Some(name) = caps.name("name") else {
            continue;
        };
        if !is_block_tag(name.as_str()) {
            continue;
        }
        let Some(tag) = caps.get(0) else {
            continue;
        };
        let void = is_void_block(name.as_str());

        if is_closing(&caps) {
            if void {
                continue;
            }
            match depth {
                // Stray end tag: keep it out of any paragraph
                0 => {
                    push_inline(&html[cursor..tag.start()], segments);
                    segments.push(tag.as_str().to_string());
                    cursor = tag.end();
                }
                1 => {
                    depth = 0;
                    segments.push(html[block_start..tag.end()].to_string());
                    cursor = tag.end();
                }
                _ => depth -= 1,
            }
        } else if depth == 0 {
            push_inline(&html[cursor..tag.start()], segments);
            if void {
                segments.push(tag.as_str().to_string());
                cursor = tag.end();
            } else {
                depth = 1;
                block_start = tag.start();
            }
        } else if !void {
            depth += 1;
        }
    }

    if depth > 0 {
        // Unclosed block element runs to the end of the input
        segments.push(html[block_start..].trim_end().to_string());
    } else {
        push_inline(&html[cursor..], segments);
    }
}

#[inline]
fn is_closing(caps: &Captures<'_>) -> bool {
    caps.name("close").is_some()
}

#[inline]
fn is_void_block(name: &str) -> bool {
    VOID_BLOCK_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Wrap each blank-line separated piece of an inline run in `<p>`, with
/// its single line breaks folded to spaces
fn push_inline(run: &str, segments: &mut Vec<String>) {
    for piece in BLANK_LINE.split(run) {
        let folded = SINGLE_BREAK.replace_all(piece, " ");
        let content = folded.trim();
        if !content.is_empty() {
            segments.push(format!("<p>{content}</p>"));
        }
    }
}

/// Plain-text projection, one escaped `<li>` per non-empty line.
///
/// Block boundaries count as line breaks so an already rendered list
/// projects back to the same lines.
fn render_list(html: &str) -> String {
    let with_newlines = LINE_BOUNDARY.replace_all(html, "\n");
    let text = ANY_TAG.replace_all(&with_newlines, "");
    let text = html_escape::decode_html_entities(&text);

    let items: Vec<String> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<li>{}</li>", html_escape::encode_quoted_attribute(line)))
        .collect();

    if items.is_empty() {
        return String::new();
    }
    format!("<ul>{}</ul>", items.concat())
}
