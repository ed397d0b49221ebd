//! Tag dispatch table for Markdown conversion.

mod builtin;
mod handler;

pub use builtin::install_builtin_rules;
pub use handler::Handler;

use indexmap::IndexMap;

use crate::options::MarkdownOptions;

static PASSTHROUGH: Handler = Handler::Passthrough;

/// Lower-case tag name → handler. Tags without an entry are passthrough.
#[derive(Debug, Clone)]
pub struct Rules {
    handlers: IndexMap<String, Handler>,
}

impl Rules {
    /// Create a table with the built-in handlers
    pub fn new(options: &MarkdownOptions) -> Self {
        let mut rules = Self {
            handlers: IndexMap::new(),
        };
        install_builtin_rules(&mut rules, options);
        rules
    }

    /// Map each of `tags` to `handler`, replacing any previous entry
    pub fn add(&mut self, tags: &[&str], handler: Handler) {
        for tag in tags {
            self.handlers.insert(tag.to_ascii_lowercase(), handler.clone());
        }
    }

    /// Emit elements with this tag as HTML
    pub fn keep(&mut self, tag: &str) {
        self.add(&[tag], Handler::Keep);
    }

    /// Drop elements with this tag, subtree included
    pub fn remove(&mut self, tag: &str) {
        self.add(&[tag], Handler::Skip);
    }

    /// Find the handler for a tag name
    pub fn for_tag(&self, tag: &str) -> &Handler {
        if let Some(handler) = self.handlers.get(tag) {
            return handler;
        }
        if tag.bytes().any(|b| b.is_ascii_uppercase()) {
            if let Some(handler) = self.handlers.get(&tag.to_ascii_lowercase()) {
                return handler;
            }
        }
        &PASSTHROUGH
    }

    /// Registered entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handler)> {
        self.handlers.iter().map(|(tag, handler)| (tag.as_str(), handler))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(&MarkdownOptions::default())
    }
}
