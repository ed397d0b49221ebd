//! Plain text extraction.
//!
//! Text is gathered the way a browser's `innerText` lays it out (hidden
//! content dropped, line breaks at block boundaries, cells separated by tabs)
//! and then normalized into compact prose.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{Node, NodeType};
use crate::utilities::{collapse_blank_lines, collapse_whitespace, is_block};

/// Subtrees that never render text
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "svg", "template", "head", "title"];

static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());
static SPACE_AROUND_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ?\n ?").unwrap());

/// Rendered, normalized text of `element`. Empty means nothing was extracted.
pub fn extract_text(element: &Node) -> String {
    normalize(&rendered_text(element))
}

/// Layout-aware text of `element`, before normalization
pub fn rendered_text(element: &Node) -> String {
    let mut out = String::new();
    push_rendered(element, false, &mut out);
    out
}

fn push_rendered(node: &Node, in_pre: bool, out: &mut String) {
    match node.node_type {
        NodeType::Text => {
            let text = node.node_value.as_deref().unwrap_or_default();
            if in_pre {
                out.push_str(text);
            } else {
                out.push_str(&collapse_whitespace(text));
            }
        }
        NodeType::Comment => {}
        NodeType::Document | NodeType::DocumentFragment => {
            node.children().for_each(|child| push_rendered(child, in_pre, out));
        }
        NodeType::Element => {
            let tag = node.tag_name();
            if NON_CONTENT_TAGS.contains(&tag.as_str()) || !node.is_rendered() {
                return;
            }

            let in_pre = in_pre || tag == "pre";
            let children = |out: &mut String| {
                node.children().for_each(|child| push_rendered(child, in_pre, out));
            };

            match tag.as_str() {
                "br" => out.push('\n'),
                "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    require_breaks(out, 2);
                    children(out);
                    require_breaks(out, 2);
                }
                "td" | "th" => {
                    children(out);
                    out.push('\t');
                }
                _ if is_block(&tag) => {
                    require_breaks(out, 1);
                    children(out);
                    require_breaks(out, 1);
                }
                _ => children(out),
            }
        }
    }
}

/// Make sure the output ends in at least `count` line breaks. Adjacent block
/// boundaries share their breaks instead of stacking them; nothing is added
/// before the first piece of text.
fn require_breaks(out: &mut String, count: usize) {
    let content = out.trim_end_matches([' ', '\t']);
    if content.is_empty() {
        return;
    }
    let existing = content.chars().rev().take_while(|&c| c == '\n').count();
    for _ in existing..count {
        out.push('\n');
    }
}

/// Normalize rendered text: unify line endings, collapse horizontal
/// whitespace, strip it around newlines, keep at most one blank line, trim.
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', " ");
    let text = HORIZONTAL_WHITESPACE.replace_all(&text, " ");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    collapse_blank_lines(&text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(tag: &str, text: &str) -> Node {
        Node::element(tag).with_child(Node::text(text))
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  a\t\tb  \n   c  "), "a b\nc");
        assert_eq!(normalize("a\r\n\r\n\r\n\r\nb"), "a\n\nb");
        assert_eq!(normalize("a \n \n \n \n b"), "a\n\nb");
        assert_eq!(normalize("a\u{a0}\u{a0}b"), "a b");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        let div = Node::element("div")
            .with_child(el("h2", "Title"))
            .with_child(
                Node::element("p")
                    .with_child(Node::text("line one"))
                    .with_child(Node::element("br"))
                    .with_child(Node::text("line   two")),
            )
            .with_child(el("p", "\n   next\n   paragraph  "));
        assert_eq!(extract_text(&div), "Title\n\nline one\nline two\n\nnext paragraph");
    }

    #[test]
    fn test_inline_elements_flow() {
        let p = Node::element("p")
            .with_child(Node::text("Hello "))
            .with_child(el("b", " world"))
            .with_child(Node::text("!"));
        assert_eq!(extract_text(&p), "Hello world!");
    }

    #[test]
    fn test_blocks_break_lines() {
        let div = Node::element("div")
            .with_child(el("div", "one"))
            .with_child(el("span", "two"))
            .with_child(Node::element("ul").with_child(el("li", "three")).with_child(el("li", "four")));
        assert_eq!(extract_text(&div), "one\ntwo\nthree\nfour");
    }

    #[test]
    fn test_hidden_and_non_content_dropped() {
        let div = Node::element("div")
            .with_child(el("p", "shown"))
            .with_child(el("p", "hidden").with_style(&[("display", "none")]))
            .with_child(el("script", "var x;"))
            .with_child(el("style", "p{}"));
        assert_eq!(extract_text(&div), "shown");
    }

    #[test]
    fn test_pre_keeps_layout() {
        let pre = el("pre", "fn main() {\n    go();\n}");
        assert_eq!(extract_text(&pre), "fn main() {\ngo();\n}");
        assert_eq!(rendered_text(&pre), "fn main() {\n    go();\n}\n");
    }

    #[test]
    fn test_table_cells() {
        let row = |a: &str, b: &str| Node::element("tr").with_child(el("td", a)).with_child(el("td", b));
        let table = Node::element("table").with_child(row("a", "b")).with_child(row("c", "d"));
        assert_eq!(extract_text(&table), "a b\nc d");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let div = Node::element("div")
            .with_child(Node::text("   "))
            .with_child(Node::element("span").with_child(Node::text("\n\t")));
        assert_eq!(extract_text(&div), "");
    }
}
