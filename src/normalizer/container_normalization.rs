//! Container element normalization
//!
//! Rewrites loosely-authored container markup into semantic paragraphs:
//! - `<span>` is unwrapped (its children take its place)
//! - `<div>` with a block-level direct child is unwrapped
//! - any other `<div>` becomes a `<p>` that adopts its children
//! - presentational attributes (`class`, `style`, `data-*`, ...) are stripped
//!   from every element
//!
//! Every node is rewritten only after all of its descendants, so an inner
//! `div` is already resolved to a `<p>` (or unwrapped) before the outer
//! `div` runs its block-child test.

use std::collections::HashSet;
use std::io;

use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeRef};

use crate::config::{
    DEFAULT_ATTRIBUTE_STRIP_LIST, DEFAULT_ATTRIBUTE_STRIP_PREFIXES, DEFAULT_BLOCK_ELEMENTS,
    NormalizerConfig,
};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Container tags this module rewrites. Everything else is left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Span,
    Div,
}

impl ContainerKind {
    fn classify(tag: &str) -> Option<Self> {
        match tag {
            "span" => Some(ContainerKind::Span),
            "div" => Some(ContainerKind::Div),
            _ => None,
        }
    }
}

/// Attribute and block-element rules applied during normalization
#[derive(Debug, Clone)]
pub struct ContainerRules {
    strip_exact: HashSet<String>,
    strip_prefixes: Vec<String>,
    block_elements: HashSet<String>,
    carry_over: Vec<String>,
}

impl Default for ContainerRules {
    fn default() -> Self {
        Self {
            strip_exact: DEFAULT_ATTRIBUTE_STRIP_LIST
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            strip_prefixes: DEFAULT_ATTRIBUTE_STRIP_PREFIXES
                .iter()
                .map(|prefix| (*prefix).to_string())
                .collect(),
            block_elements: DEFAULT_BLOCK_ELEMENTS
                .iter()
                .map(|tag| (*tag).to_string())
                .collect(),
            carry_over: Vec::new(),
        }
    }
}

impl From<&NormalizerConfig> for ContainerRules {
    fn from(config: &NormalizerConfig) -> Self {
        Self {
            strip_exact: config.attribute_strip_list().iter().cloned().collect(),
            strip_prefixes: config.attribute_strip_prefixes().to_vec(),
            block_elements: config.block_elements().iter().cloned().collect(),
            carry_over: config.carry_over_attributes().to_vec(),
        }
    }
}

impl ContainerRules {
    #[inline]
    fn should_strip(&self, attribute: &str) -> bool {
        self.strip_exact.contains(attribute)
            || self
                .strip_prefixes
                .iter()
                .any(|prefix| attribute.starts_with(prefix.as_str()))
    }

    #[inline]
    fn is_block(&self, tag: &str) -> bool {
        self.block_elements.contains(tag)
    }
}

/// Normalize container elements using the default rules.
///
/// # Example
/// ```rust
/// # use kodegen_tools_richtext::normalizer::container_normalization::normalize_containers;
/// assert_eq!(normalize_containers("<div>A<div>B</div></div>"), "A<p>B</p>");
/// assert_eq!(normalize_containers("<span class=x>hi</span> there"), "hi there");
/// ```
#[must_use]
pub fn normalize_containers(html: &str) -> String {
    normalize_containers_with(html, &ContainerRules::default())
}

/// Normalize container elements using explicit rules.
///
/// The input is parsed as a fragment in `<body>` context, so comments and
/// head-only elements such as `<title>` stay where the author put them.
/// Parsing is lenient: unclosed and overlapping tags are repaired by the
/// HTML5 tree builder. Only the fragment's children are serialized back, so
/// no `<html>`, `<head>` or `<body>` scaffolding reaches the output.
#[must_use]
pub fn normalize_containers_with(html: &str, rules: &ContainerRules) -> String {
    let document = kuchiki::parse_fragment(body_context(), Vec::new()).one(html.to_string());

    let root = match document.select_first("html") {
        Ok(root) => root.as_node().clone(),
        Err(()) => {
            log::warn!("Parsed fragment has no root element, skipping container normalization");
            return html.to_string();
        }
    };

    normalize_descendants(&root, rules);

    match serialize_children(&root) {
        Ok(serialized) => serialized,
        Err(e) => {
            log::warn!("Failed to serialize normalized HTML: {}, using original HTML", e);
            html.to_string()
        }
    }
}

fn body_context() -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from("body"),
    )
}

/// Visit every node below `root` with all of its descendants first.
///
/// Reverse document order has that property and needs no recursion, so
/// deeply nested input cannot exhaust the stack.
fn normalize_descendants(root: &NodeRef, rules: &ContainerRules) {
    // Collect before iterating: rewrites detach and splice nodes
    let nodes: Vec<NodeRef> = root.descendants().collect();
    for node in nodes.iter().rev() {
        normalize_node(node, rules);
    }
}

fn normalize_node(node: &NodeRef, rules: &ContainerRules) {
    let Some(element) = node.as_element() else {
        return;
    };

    strip_attributes(element, rules);

    match ContainerKind::classify(&element.name.local) {
        Some(ContainerKind::Span) => unwrap(node),
        Some(ContainerKind::Div) => {
            if has_block_child(node, rules) {
                unwrap(node);
            } else {
                replace_with_paragraph(node, element, rules);
            }
        }
        None => {}
    }
}

fn strip_attributes(element: &ElementData, rules: &ContainerRules) {
    let mut attributes = element.attributes.borrow_mut();
    attributes
        .map
        .retain(|name, _| !rules.should_strip(&name.local));
}

/// Direct children only; deeper descendants do not count
fn has_block_child(node: &NodeRef, rules: &ContainerRules) -> bool {
    node.children().any(|child| {
        child
            .as_element()
            .is_some_and(|element| rules.is_block(&element.name.local))
    })
}

/// Splice `node`'s children into its parent at its position, then drop it
fn unwrap(node: &NodeRef) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        node.insert_before(child);
    }
    node.detach();
}

fn replace_with_paragraph(node: &NodeRef, div: &ElementData, rules: &ContainerRules) {
    let Some(paragraph) = new_paragraph() else {
        log::warn!("Could not create <p> replacement, unwrapping <div> instead");
        unwrap(node);
        return;
    };

    if let Some(target) = paragraph.as_element() {
        let source = div.attributes.borrow();
        let mut target_attributes = target.attributes.borrow_mut();
        for name in &rules.carry_over {
            if let Some(value) = source.get(name.as_str()) {
                target_attributes.insert(name.as_str(), value.to_string());
            }
        }
    }

    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        paragraph.append(child);
    }
    node.insert_before(paragraph.clone());
    node.detach();

    if let Some(target) = paragraph.as_element() {
        strip_attributes(target, rules);
    }
}

/// A detached, attribute-less `<p>` element
fn new_paragraph() -> Option<NodeRef> {
    let fragment = kuchiki::parse_html().one("<p></p>");
    let paragraph = fragment.select_first("p").ok()?.as_node().clone();
    paragraph.detach();
    Some(paragraph)
}

fn serialize_children(parent: &NodeRef) -> io::Result<String> {
    let mut output = Vec::new();
    for child in parent.children() {
        child.serialize(&mut output)?;
    }
    String::from_utf8(output).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_div_resolves_inner_first() {
        assert_eq!(normalize_containers("<div>A<div>B</div></div>"), "A<p>B</p>");
    }

    #[test]
    fn test_span_unwrap_keeps_surrounding_text() {
        assert_eq!(normalize_containers("<span class=x>hi</span> there"), "hi there");
    }

    #[test]
    fn test_inline_div_becomes_paragraph_without_attributes() {
        let html = r#"<div class="c" id="main" data-x="1" dir="ltr">Hello <b>world</b></div>"#;
        assert_eq!(normalize_containers(html), "<p>Hello <b>world</b></p>");
    }

    #[test]
    fn test_div_with_list_child_is_unwrapped() {
        let html = "<div><ul><li>a</li></ul></div>";
        assert_eq!(normalize_containers(html), "<ul><li>a</li></ul>");
    }

    #[test]
    fn test_block_test_ignores_grandchildren() {
        // <ul> is a grandchild of the outer div, so the outer div becomes <p>
        let html = "<div><b><ul><li>x</li></ul></b></div>";
        let result = normalize_containers(html);
        assert!(result.starts_with("<p>"), "got {result}");
    }

    #[test]
    fn test_empty_div_becomes_empty_paragraph() {
        assert_eq!(normalize_containers("<div></div>"), "<p></p>");
    }

    #[test]
    fn test_spans_inside_div_are_flattened() {
        assert_eq!(
            normalize_containers("<div><span>a</span><span style=\"x\">b</span></div>"),
            "<p>ab</p>"
        );
    }

    #[test]
    fn test_attribute_rules_apply_to_every_element() {
        let html = r#"<a href="/x" class="btn" aria-label="go" role="button" title="t">x</a>"#;
        assert_eq!(normalize_containers(html), r#"<a href="/x" title="t">x</a>"#);
    }

    #[test]
    fn test_no_document_scaffolding_in_output() {
        let result = normalize_containers("<html><body><div>x</div></body></html>");
        assert_eq!(result, "<p>x</p>");
    }

    #[test]
    fn test_leading_comment_and_title_stay_in_place() {
        assert_eq!(normalize_containers("<!-- c -->Hello"), "<!-- c -->Hello");
        assert_eq!(
            normalize_containers("<title>T</title><div>x</div>"),
            "<title>T</title><p>x</p>"
        );
    }

    #[test]
    fn test_leading_whitespace_is_kept_as_text() {
        assert_eq!(normalize_containers("  <span>x</span>"), "  x");
    }

    #[test]
    fn test_malformed_markup_is_recovered() {
        let result = normalize_containers("<div><b>bold</div> tail <span>open");
        assert!(result.contains("bold"));
        assert!(result.contains("tail"));
        assert!(result.contains("open"));
        assert!(!result.contains("<div"));
        assert!(!result.contains("<span"));
    }

    #[test]
    fn test_carry_over_attributes_survive_on_paragraph() {
        let config = NormalizerConfig::builder()
            .carry_over_attributes(["title", "class"])
            .build()
            .expect("valid config");
        let rules = ContainerRules::from(&config);
        let html = r#"<div title="t" class="c">x</div>"#;
        // class is carried but still stripped afterwards
        assert_eq!(normalize_containers_with(html, &rules), r#"<p title="t">x</p>"#);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 2_000;
        let html = format!("{}x{}", "<span>".repeat(depth), "</span>".repeat(depth));
        assert_eq!(normalize_containers(&html), "x");
    }

    #[test]
    fn test_custom_block_elements() {
        let config = NormalizerConfig::builder()
            .block_elements(["blockquote"])
            .build()
            .expect("valid config");
        let rules = ContainerRules::from(&config);
        assert_eq!(
            normalize_containers_with("<div><blockquote>q</blockquote></div>", &rules),
            "<blockquote>q</blockquote>"
        );
    }
}
