//! Converter - the main entry point for turning a DOM subtree into text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::markdown::MarkdownSerializer;
use crate::node::{Node, NodePath};
use crate::options::ConvertOptions;
use crate::picker::{ElementPicker, Picked};
use crate::rules::{Handler, Rules};
use crate::text::extract_text;
use crate::utilities::count_words;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    /// Rendered, normalized text
    #[default]
    #[serde(rename = "text")]
    PlainText,
    /// CommonMark-flavoured Markdown
    #[serde(rename = "markdown")]
    Markdown,
}

impl Format {
    /// Parse a format selector. Only `"markdown"` selects Markdown; anything
    /// else falls back to plain text.
    pub fn from_selector(selector: &str) -> Self {
        if selector.trim().eq_ignore_ascii_case("markdown") {
            Format::Markdown
        } else {
            Format::PlainText
        }
    }

    /// Selector string for this format
    pub fn selector(self) -> &'static str {
        match self {
            Format::PlainText => "text",
            Format::Markdown => "markdown",
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            Format::PlainText => "Plain text",
            Format::Markdown => "Markdown",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A finished extraction: the text and what is known about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    text: String,
    format: Format,
    char_count: usize,
    word_count: usize,
}

impl Extraction {
    pub fn new(text: String, format: Format) -> Self {
        let char_count = text.chars().count();
        let word_count = count_words(&text);
        Self {
            text,
            format,
            char_count,
            word_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Length in Unicode scalar values
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// One-line description, e.g. `Markdown · 42 chars · 7 words`
    pub fn summary(&self) -> String {
        format!(
            "{} · {} chars · {} words",
            self.format, self.char_count, self.word_count
        )
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Converts DOM subtrees to plain text or Markdown.
///
/// Holds options and the Markdown rule table; every call is independent, so
/// one converter can be shared across threads.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    rules: Rules,
}

impl Converter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a converter with custom options
    pub fn with_options(options: ConvertOptions) -> Self {
        let rules = Rules::new(&options.markdown);
        Self { options, rules }
    }

    /// Get the current options
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// The Markdown rule table
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Map tags to a handler, replacing the built-in entry
    pub fn add_rule(&mut self, tags: &[&str], handler: Handler) -> &mut Self {
        self.rules.add(tags, handler);
        self
    }

    /// Emit elements with this tag as HTML in Markdown output
    pub fn keep(&mut self, tag: &str) -> &mut Self {
        self.rules.keep(tag);
        self
    }

    /// Drop elements with this tag from Markdown output
    pub fn remove(&mut self, tag: &str) -> &mut Self {
        self.rules.remove(tag);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Convert `element` and its subtree. Never fails; an empty string means
    /// nothing was extracted.
    pub fn convert(&self, element: &Node, format: Format) -> String {
        self.convert_under(element, None, format)
    }

    /// Convert `element` knowing its parent in the surrounding tree
    fn convert_under(&self, element: &Node, parent: Option<&Node>, format: Format) -> String {
        let output = match format {
            Format::Markdown => MarkdownSerializer::new(&self.rules, &self.options.markdown)
                .serialize_with_parent(element, parent),
            Format::PlainText => self.extract_text(element),
        };
        tracing::debug!(%format, tag = %element.node_name, bytes = output.len(), "converted subtree");
        output
    }

    pub fn to_markdown(&self, element: &Node) -> String {
        MarkdownSerializer::new(&self.rules, &self.options.markdown).serialize(element)
    }

    pub fn extract_text(&self, element: &Node) -> String {
        extract_text(element)
    }

    /// Convert and wrap the result, failing when there is no text.
    pub fn extract(&self, element: &Node, format: Format) -> Result<Extraction> {
        finish_extraction(self.convert(element, format), format)
    }

    /// Extract the node at `path` inside `root`. The node's parent in `root`
    /// is taken into account, so a picked `code` inside `pre` stays a block.
    pub fn extract_at(&self, root: &Node, path: &NodePath, format: Format) -> Result<Extraction> {
        let element = root
            .get(path)
            .ok_or_else(|| ExtractError::InvalidPath(path.indices().to_vec()))?;
        let parent = path.parent().and_then(|parent| root.get(&parent));
        finish_extraction(self.convert_under(element, parent, format), format)
    }

    /// Choose the extraction boundary for the node at `target`
    pub fn pick<'a>(&self, root: &'a Node, target: &NodePath) -> Result<Picked<'a>> {
        ElementPicker::new(&self.options.picker)
            .pick(root, target)
            .ok_or(ExtractError::NoCandidateElement)
    }

    /// Parse an HTML fragment and convert it
    #[cfg(feature = "html")]
    pub fn convert_html(&self, html: &str, format: Format) -> String {
        self.convert(&crate::html::parse_html(html), format)
    }
}

fn finish_extraction(text: String, format: Format) -> Result<Extraction> {
    let extraction = Extraction::new(text, format);
    if extraction.is_empty() {
        return Err(ExtractError::EmptyExtraction { format });
    }
    Ok(extraction)
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Rect;
    use crate::options::{BlockquoteStyle, MarkdownOptions};

    fn el(tag: &str, text: &str) -> Node {
        Node::element(tag).with_child(Node::text(text))
    }

    fn article() -> Node {
        Node::element("article")
            .with_child(el("h1", "Title"))
            .with_child(
                Node::element("p")
                    .with_child(Node::text("Some "))
                    .with_child(el("strong", "bold"))
                    .with_child(Node::text(" words.")),
            )
    }

    #[test]
    fn test_format_selector() {
        assert_eq!(Format::from_selector("markdown"), Format::Markdown);
        assert_eq!(Format::from_selector("MarkDown"), Format::Markdown);
        assert_eq!(Format::from_selector("text"), Format::PlainText);
        assert_eq!(Format::from_selector("html"), Format::PlainText);
        assert_eq!(Format::from_selector(""), Format::PlainText);
        assert_eq!(Format::Markdown.selector(), "markdown");
    }

    #[test]
    fn test_format_serde() {
        assert_eq!(serde_json::to_string(&Format::PlainText).unwrap(), r#""text""#);
        let format: Format = serde_json::from_str(r#""markdown""#).unwrap();
        assert_eq!(format, Format::Markdown);
    }

    #[test]
    fn test_convert_both_formats() {
        let converter = Converter::new();
        assert_eq!(
            converter.convert(&article(), Format::Markdown),
            "# Title\n\nSome **bold** words."
        );
        assert_eq!(
            converter.convert(&article(), Format::PlainText),
            "Title\n\nSome bold words."
        );
    }

    #[test]
    fn test_convert_is_repeatable() {
        let converter = Converter::new();
        let node = article();
        let first = converter.convert(&node, Format::Markdown);
        assert_eq!(converter.convert(&node, Format::Markdown), first);
    }

    #[test]
    fn test_extraction_metadata() {
        let extraction = Converter::new().extract(&article(), Format::PlainText).unwrap();
        assert_eq!(extraction.text(), "Title\n\nSome bold words.");
        assert_eq!(extraction.word_count(), 4);
        assert_eq!(extraction.char_count(), 23);
        assert_eq!(extraction.summary(), "Plain text · 23 chars · 4 words");
    }

    #[test]
    fn test_char_count_is_unicode_scalars() {
        let extraction = Extraction::new("héllo 😀".to_string(), Format::PlainText);
        assert_eq!(extraction.char_count(), 7);
        assert_eq!(extraction.word_count(), 2);
    }

    #[test]
    fn test_empty_extraction() {
        let blank = Node::element("div").with_child(Node::text("  \n "));
        let converter = Converter::new();
        for format in [Format::PlainText, Format::Markdown] {
            assert_eq!(converter.convert(&blank, format), "");
            assert_eq!(
                converter.extract(&blank, format),
                Err(ExtractError::EmptyExtraction { format })
            );
        }
    }

    #[test]
    fn test_extract_at_invalid_path() {
        let converter = Converter::new();
        let path = NodePath::from_indices([4, 2]);
        assert_eq!(
            converter.extract_at(&article(), &path, Format::Markdown),
            Err(ExtractError::InvalidPath(vec![4, 2]))
        );
        let ok = converter
            .extract_at(&article(), &NodePath::from_indices([0]), Format::Markdown)
            .unwrap();
        assert_eq!(ok.text(), "# Title");
    }

    #[test]
    fn test_extract_at_sees_parent_pre() {
        let root = Node::element("body").with_child(
            Node::element("pre").with_child(el("code", "fn a() {}\nfn b() {}")),
        );
        let converter = Converter::new();
        let code = converter
            .extract_at(&root, &NodePath::from_indices([0, 0]), Format::Markdown)
            .unwrap();
        assert_eq!(code.into_text(), "fn a() {}\nfn b() {}");

        let detached = root.get(&NodePath::from_indices([0, 0])).unwrap();
        assert_eq!(converter.to_markdown(detached), "`fn a() {}\nfn b() {}`");
    }

    #[test]
    fn test_pick_reports_missing_candidate() {
        let root = Node::element("body")
            .with_layout(Rect::new(0.0, 0.0, 800.0, 600.0))
            .with_child(Node::element("span").with_layout(Rect::new(0.0, 0.0, 4.0, 4.0)));
        assert_eq!(
            Converter::new().pick(&root, &NodePath::from_indices([0])),
            Err(ExtractError::NoCandidateElement)
        );
    }

    #[test]
    fn test_rule_customization() {
        let mut converter = Converter::new();
        converter
            .remove("h1")
            .keep("strong")
            .use_plugin(|c| {
                c.add_rule(&["mark"], Handler::delimit("=="));
            });

        let node = article().with_child(el("mark", "hi"));
        assert_eq!(
            converter.convert(&node, Format::Markdown),
            "Some <strong>bold</strong> words.\n\n==hi=="
        );
    }

    #[test]
    fn test_options_reach_serializer() {
        let options = ConvertOptions {
            markdown: MarkdownOptions {
                strong_delimiter: "__".to_string(),
                blockquote_style: BlockquoteStyle::EveryLine,
                ..Default::default()
            },
            ..Default::default()
        };
        let converter = Converter::with_options(options);
        assert_eq!(converter.options().markdown.strong_delimiter, "__");
        assert_eq!(converter.rules().for_tag("b"), &Handler::delimit("__"));
        assert_eq!(converter.convert(&article(), Format::Markdown), "# Title\n\nSome __bold__ words.");
    }

    #[test]
    fn test_converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }
}
