//! Built-in tag table.

use super::{Handler, Rules};
use crate::options::MarkdownOptions;

/// Tags whose subtree never contributes to the output
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "svg", "path"];

/// Register the default tag → handler entries
pub fn install_builtin_rules(rules: &mut Rules, options: &MarkdownOptions) {
    for level in 1..=6u8 {
        let tag = format!("h{}", level);
        rules.add(&[tag.as_str()], Handler::Heading(level));
    }
    rules.add(&["p"], Handler::Paragraph);
    rules.add(&["br"], Handler::LineBreak);
    rules.add(&["strong", "b"], Handler::delimit(&options.strong_delimiter));
    rules.add(&["em", "i"], Handler::delimit(&options.em_delimiter));
    rules.add(&["u"], Handler::wrap("<u>", "</u>"));
    rules.add(&["s", "strike", "del"], Handler::delimit("~~"));
    rules.add(&["code"], Handler::Code);
    rules.add(&["pre"], Handler::CodeBlock);
    rules.add(&["blockquote"], Handler::Blockquote);
    rules.add(&["a"], Handler::Link);
    rules.add(&["img"], Handler::Image);
    rules.add(&["ul"], Handler::List { ordered: false });
    rules.add(&["ol"], Handler::List { ordered: true });
    rules.add(&["hr"], Handler::ThematicBreak);
    rules.add(&["table"], Handler::Table);
    rules.add(SKIPPED_TAGS, Handler::Skip);
}
