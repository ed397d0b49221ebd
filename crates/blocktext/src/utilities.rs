//! Utility functions and constants shared by the walkers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
    "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "li", "main", "menu", "nav", "ol",
    "p", "pre", "section", "summary", "table", "tbody", "tfoot", "thead", "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.iter().any(|b| b.eq_ignore_ascii_case(tag))
}

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Collapse every whitespace run (newlines included) to a single space
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Collapse runs of three or more newlines to exactly two
pub fn collapse_blank_lines(s: &str) -> String {
    BLANK_LINES.replace_all(s, "\n\n").into_owned()
}

/// Whitespace-delimited, non-empty tokens
pub fn count_words(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Escape a table cell's pipes so the row stays well-formed
pub fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_block() {
        assert!(is_block("div"));
        assert!(is_block("P"));
        assert!(!is_block("span"));
        assert!(!is_block("a"));
    }

    #[test]
    fn test_is_void() {
        assert!(is_void("br"));
        assert!(is_void("IMG"));
        assert!(!is_void("div"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\t b  "), " a b ");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n\nc\nd"), "a\n\nb\n\nc\nd");
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("  one two\n\nthree  "), 3);
        assert_eq!(count_words(" \n "), 0);
    }

    #[test]
    fn test_escape_table_cell() {
        assert_eq!(escape_table_cell("a|b"), "a\\|b");
    }
}
