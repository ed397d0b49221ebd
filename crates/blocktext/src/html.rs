//! HTML parsing support.
//!
//! Turns an HTML string into the [`Node`] tree the converter walks. Parsed
//! trees carry no layout, and visibility comes only from inline `style` and
//! `hidden` attributes.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree rooted at an `html` element.
///
/// # Example
///
/// ```rust
/// use blocktext::{parse_html, Converter, Format};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
/// let markdown = Converter::new().convert(&node, Format::Markdown);
/// assert_eq!(markdown, "# Hello *World*");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Parse a full document; the root is its `html` element.
pub fn parse_document(html: &str) -> Node {
    let document = Html::parse_document(html);
    scraper_to_node(document.root_element())
}

/// Copy a scraper element and its subtree into a [`Node`].
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = if attrs.is_empty() {
        Node::element(tag)
    } else {
        Node::element_with_attrs(tag, attrs)
    };

    // Text keeps its raw whitespace; the walkers collapse it. Comments,
    // doctypes and processing instructions carry no content and are dropped.
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => node.add_child(Node::text(&text.text)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
