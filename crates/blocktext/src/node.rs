//! CDP-style DOM snapshot used as conversion input.
//!
//! The structure follows the Chrome DevTools Protocol `DOM.Node` shape, extended
//! with the two pieces of layout information the picker and the walkers need:
//! the computed style (as a flat `[property, value, ...]` list, like
//! `CSS.getComputedStyleForNode`) and the border box in CSS pixels.
//!
//! Nodes carry no parent pointers. Ancestors are reached through a
//! [`NodePath`] from the subtree root.

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::utilities::is_void;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl From<u32> for NodeType {
    fn from(value: u32) -> Self {
        match value {
            1 => NodeType::Element,
            3 => NodeType::Text,
            8 => NodeType::Comment,
            9 => NodeType::Document,
            11 => NodeType::DocumentFragment,
            _ => NodeType::Element, // Default fallback
        }
    }
}

impl From<NodeType> for u32 {
    fn from(value: NodeType) -> Self {
        value as u32
    }
}

/// Border box of a rendered element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside the box (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// The subset of computed style the converter cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    pub display: Option<String>,
    pub visibility: Option<String>,
}

impl ComputedStyle {
    /// Build from a CDP flat list: `["display", "block", "visibility", "visible", ...]`.
    pub fn from_pairs(pairs: &[String]) -> Result<Self, StyleError> {
        if pairs.len() % 2 != 0 {
            let dangling = pairs.last().cloned().unwrap_or_default();
            return Err(StyleError::UnpairedProperty(dangling));
        }

        let mut style = Self::default();
        for pair in pairs.chunks_exact(2) {
            style.apply(&pair[0], &pair[1]);
        }
        Ok(style)
    }

    /// Build from an inline `style` attribute. Malformed declarations are
    /// ignored, as browsers do.
    pub fn from_declarations(css: &str) -> Self {
        let mut style = Self::default();
        for declaration in css.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let value = value.trim();
                let value = value
                    .strip_suffix("!important")
                    .map(str::trim_end)
                    .unwrap_or(value);
                style.apply(name.trim(), value);
            }
        }
        style
    }

    fn apply(&mut self, name: &str, value: &str) {
        let value = value.trim().to_ascii_lowercase();
        if name.eq_ignore_ascii_case("display") {
            self.display = Some(value);
        } else if name.eq_ignore_ascii_case("visibility") {
            self.visibility = Some(value);
        }
    }

    /// `false` for `display: none` and `visibility: hidden | collapse`.
    pub fn is_rendered(&self) -> bool {
        let hidden_display = self.display.as_deref() == Some("none");
        let hidden_visibility = matches!(self.visibility.as_deref(), Some("hidden" | "collapse"));
        !hidden_display && !hidden_visibility
    }
}

/// Index path from a subtree root to one of its descendants.
///
/// The empty path addresses the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(indices.into_iter().collect())
    }

    /// Path of the `index`-th child of the node at this path.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

/// A DOM node following the CDP DOM.Node structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text nodes
    #[serde(default)]
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    #[serde(default)]
    pub attributes: Option<Vec<String>>,

    /// Computed style as flat array [property, value, ...]; absent when the
    /// snapshot carries no style information
    #[serde(default)]
    pub computed_style: Option<Vec<String>>,

    /// Border box; absent for nodes that are not laid out
    #[serde(default)]
    pub layout: Option<Rect>,

    /// Child nodes
    #[serde(default)]
    pub children: Option<Vec<Node>>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(Vec::new()),
            computed_style: None,
            layout: None,
            children: Some(Vec::new()),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        node.attributes = Some(
            attrs
                .into_iter()
                .flat_map(|(k, v)| [k.to_string(), v.to_string()])
                .collect(),
        );
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            computed_style: None,
            layout: None,
            children: None,
        }
    }

    /// Attach a border box
    pub fn with_layout(mut self, rect: Rect) -> Self {
        self.layout = Some(rect);
        self
    }

    /// Attach computed style properties
    pub fn with_style(mut self, properties: &[(&str, &str)]) -> Self {
        self.computed_style = Some(
            properties
                .iter()
                .flat_map(|(k, v)| [k.to_string(), v.to_string()])
                .collect(),
        );
        self
    }

    /// Append a child and return self, for building trees inline
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Case-insensitive tag comparison without allocating
    pub fn is_tag(&self, name: &str) -> bool {
        self.is_element() && self.node_name.eq_ignore_ascii_case(name)
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = self.attributes.as_ref()?;
        attrs
            .chunks_exact(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
            .map(|pair| pair[1].as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Whether the whitespace-separated `class` attribute contains `class_name`
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class_name))
    }

    /// Get all child nodes
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// All descendants in document order, excluding self
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children().rev().collect(),
        }
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let attrs = self.attributes.get_or_insert_with(Vec::new);
        if let Some(pair) = attrs
            .chunks_exact_mut(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
        {
            pair[1] = value.to_string();
            return;
        }
        attrs.push(name.to_string());
        attrs.push(value.to_string());
    }

    /// Resolve the node's display/visibility.
    ///
    /// Prefers the snapshot's computed style; falls back to the inline `style`
    /// attribute and the `hidden` attribute.
    pub fn style(&self) -> Result<ComputedStyle, StyleError> {
        if let Some(pairs) = &self.computed_style {
            return ComputedStyle::from_pairs(pairs);
        }

        let mut style = self
            .attr("style")
            .map(ComputedStyle::from_declarations)
            .unwrap_or_default();
        if style.display.is_none() && self.has_attr("hidden") {
            style.display = Some("none".to_string());
        }
        Ok(style)
    }

    /// Whether the walkers should descend into this node. Style that cannot be
    /// resolved counts as visible.
    pub fn is_rendered(&self) -> bool {
        if !self.is_element() {
            return true;
        }
        match self.style() {
            Ok(style) => style.is_rendered(),
            Err(error) => {
                tracing::debug!(tag = %self.node_name, %error, "unreadable style, assuming visible");
                true
            }
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text_content(&mut out);
        out
    }

    fn push_text_content(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or_default()),
            NodeType::Comment => {}
            _ => self.children().for_each(|child| child.push_text_content(out)),
        }
    }

    /// Resolve a path relative to this node
    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        path.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.as_ref()?.get(index))
    }

    /// The chain from this node down to the node at `path`, both inclusive.
    pub fn ancestry(&self, path: &NodePath) -> Option<Vec<&Node>> {
        let mut chain = Vec::with_capacity(path.depth() + 1);
        let mut node = self;
        chain.push(node);
        for &index in path.indices() {
            node = node.children.as_ref()?.get(index)?;
            chain.push(node);
        }
        Some(chain)
    }

    /// Reconstruct outer HTML (for keep rules)
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => escape_html_text(self.node_value.as_deref().unwrap_or_default()),
            NodeType::Comment => String::new(),
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.attributes_string();
                let open = if attrs.is_empty() {
                    format!("<{}>", tag)
                } else {
                    format!("<{} {}>", tag, attrs)
                };

                if is_void(&tag) {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(), tag)
                }
            }
            _ => self.inner_html(),
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children().map(Node::outer_html).collect()
    }

    fn attributes_string(&self) -> String {
        let Some(ref attrs) = self.attributes else {
            return String::new();
        };

        attrs
            .chunks_exact(2)
            .map(|pair| {
                if pair[1].is_empty() {
                    pair[0].clone()
                } else {
                    format!("{}=\"{}\"", pair[0], escape_html_attr(&pair[1]))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Depth-first, document-order iterator over a node's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().rev());
        Some(node)
    }
}

fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
