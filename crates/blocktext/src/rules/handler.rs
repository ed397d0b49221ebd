//! Handler strategies for Markdown emission.

/// What the Markdown walker does with an element of a given tag.
///
/// The set is closed: new tags are supported by mapping them onto one of
/// these strategies in [`super::Rules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// `#`×level heading
    Heading(u8),
    /// Children followed by a blank line
    Paragraph,
    /// Hard line break
    LineBreak,
    /// Children surrounded by fixed delimiters (`**`, `*`, `~~`, `<u>`)
    Wrap { open: String, close: String },
    /// Inline code, or bare children when directly inside `pre`
    Code,
    /// Fenced code block with an optional language hint
    CodeBlock,
    /// Quoted block
    Blockquote,
    /// Inline link, unless the target is missing or a script URL
    Link,
    /// Inline image
    Image,
    /// Bulleted or numbered list over the direct `li` children
    List { ordered: bool },
    /// Horizontal rule
    ThematicBreak,
    /// Pipe table built from every descendant row
    Table,
    /// Reconstructed outer HTML, verbatim
    Keep,
    /// Nothing, children included
    Skip,
    /// Children only
    Passthrough,
}

impl Handler {
    /// Wrap children in `open` and `close`
    pub fn wrap(open: &str, close: &str) -> Self {
        Handler::Wrap {
            open: open.to_string(),
            close: close.to_string(),
        }
    }

    /// Wrap children in the same delimiter on both sides
    pub fn delimit(delimiter: &str) -> Self {
        Self::wrap(delimiter, delimiter)
    }
}
