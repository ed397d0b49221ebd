//! Configuration options for conversion and picking.
//!
//! Every struct deserializes from a partial document: missing fields take
//! their defaults.
//!
//! ```rust
//! use blocktext::{BlockquoteStyle, ConvertOptions};
//!
//! let options: ConvertOptions = serde_json::from_str(
//!     r#"{ "markdown": { "blockquote-style": "every-line" }, "picker": { "min-width": 30 } }"#,
//! ).unwrap();
//! assert_eq!(options.markdown.blockquote_style, BlockquoteStyle::EveryLine);
//! assert_eq!(options.picker.min_width, 30.0);
//! assert_eq!(options.picker.min_height, 12.0);
//! ```

use serde::{Deserialize, Serialize};

/// How a blockquote marks its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockquoteStyle {
    /// Emit `> ` once, before the quoted content
    #[default]
    FirstLine,
    /// Prefix every line of the quoted content with `> `
    EveryLine,
}

/// Options for Markdown serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MarkdownOptions {
    /// Thematic break string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Indentation added per list nesting level
    pub list_indent: String,

    /// Fence string for code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: String,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Blockquote marking
    pub blockquote_style: BlockquoteStyle,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            hr: "---".to_string(),
            bullet_list_marker: '-',
            list_indent: "  ".to_string(),
            fence: "```".to_string(),
            em_delimiter: "*".to_string(),
            strong_delimiter: "**".to_string(),
            blockquote_style: BlockquoteStyle::FirstLine,
        }
    }
}

/// Options for the element picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PickerOptions {
    /// Smallest border-box width an element needs to be picked, in CSS pixels
    pub min_width: f64,

    /// Smallest border-box height an element needs to be picked, in CSS pixels
    pub min_height: f64,

    /// Tags that end the upward search with no candidate
    pub excluded_tags: Vec<String>,

    /// `id`s of the elements the host injects into the page (highlight
    /// overlay, toast); these are never picked
    pub injected_ids: Vec<String>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            min_width: 24.0,
            min_height: 12.0,
            excluded_tags: ["script", "style", "noscript", "meta", "link", "html", "body"]
                .map(String::from)
                .to_vec(),
            injected_ids: ["bte-overlay", "bte-toast"].map(String::from).to_vec(),
        }
    }
}

/// All converter options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConvertOptions {
    pub markdown: MarkdownOptions,
    pub picker: PickerOptions,
}
