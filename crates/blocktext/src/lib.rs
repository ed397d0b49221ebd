//! # blocktext
//!
//! Extract a block of a web page as plain text or Markdown.
//!
//! The input is a CDP-style DOM [`Node`] tree, optionally carrying computed
//! style and layout boxes from a browser snapshot. Two operations sit on top
//! of it:
//!
//! - **Picking**: from the element under the pointer, walk up to the nearest
//!   ancestor large enough to be a meaningful block ([`ElementPicker`]).
//! - **Conversion**: serialize that subtree either as rendered text or as
//!   Markdown ([`Converter`]).
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use blocktext::{Converter, Format, Node};
//!
//! let mut h1 = Node::element("h1");
//! h1.add_child(Node::text("Hello World"));
//!
//! let converter = Converter::new();
//! assert_eq!(converter.convert(&h1, Format::Markdown), "# Hello World");
//! assert_eq!(converter.convert(&h1, Format::PlainText), "Hello World");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use blocktext::{Converter, Format};
//!
//! let converter = Converter::new();
//! let extraction = converter
//!     .extract(&blocktext::parse_html("<ul><li>one</li><li>two</li></ul>"), Format::Markdown)
//!     .unwrap();
//! assert_eq!(extraction.text(), "- one\n- two");
//! assert_eq!(extraction.summary(), "Markdown · 11 chars · 4 words");
//! ```

pub mod convert;
pub mod error;
#[cfg(feature = "html")]
pub mod html;
pub mod markdown;
pub mod node;
pub mod options;
pub mod picker;
mod rules;
pub mod text;
mod utilities;

use once_cell::sync::Lazy;

pub use convert::{Converter, Extraction, Format};
pub use error::{ExtractError, Result, StyleError};
#[cfg(feature = "html")]
pub use html::{parse_document, parse_html};
pub use markdown::MarkdownSerializer;
pub use node::{ComputedStyle, Node, NodePath, NodeType, Rect};
pub use options::{BlockquoteStyle, ConvertOptions, MarkdownOptions, PickerOptions};
pub use picker::{hit_test, ElementPicker, Picked};
pub use rules::{Handler, Rules};
pub use utilities::{collapse_whitespace, count_words};

static DEFAULT_CONVERTER: Lazy<Converter> = Lazy::new(Converter::new);

/// Convert `element` with default options.
pub fn convert(element: &Node, format: Format) -> String {
    DEFAULT_CONVERTER.convert(element, format)
}
