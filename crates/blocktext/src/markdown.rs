//! Markdown serialization of a DOM subtree.
//!
//! The walk is a depth-first fold: every handler appends pieces to a
//! [`Fragments`] buffer that is threaded through the recursion by `&mut`.
//! Text is borrowed from the tree where possible; the pieces are joined and
//! cleaned once at the end.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{Node, NodeType};
use crate::options::{BlockquoteStyle, MarkdownOptions};
use crate::rules::{Handler, Rules};
use crate::utilities::{collapse_blank_lines, escape_table_cell};

static LANGUAGE_HINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"language-([A-Za-z0-9_]+)").unwrap());

/// Ordered buffer of output pieces.
#[derive(Debug, Default)]
pub struct Fragments<'a> {
    parts: Vec<Cow<'a, str>>,
}

impl<'a> Fragments<'a> {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    pub fn push(&mut self, part: impl Into<Cow<'a, str>>) {
        let part = part.into();
        if !part.is_empty() {
            self.parts.push(part);
        }
    }

    /// Number of pieces pushed so far
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// `true` at the very start or right after a newline
    pub fn at_line_start(&self) -> bool {
        self.parts.last().map_or(true, |part| part.ends_with('\n'))
    }

    /// Remove every piece from position `mark` on and return them joined
    pub fn take_from(&mut self, mark: usize) -> String {
        self.parts.drain(mark.min(self.parts.len())..).collect()
    }

    /// Join the pieces, collapse blank-line runs and trim
    pub fn finish(self) -> String {
        let joined: String = self.parts.concat();
        collapse_blank_lines(&joined)
            .trim_matches('\n')
            .trim()
            .to_string()
    }
}

/// Parent and list nesting at the current point of the walk
#[derive(Debug, Clone, Copy, Default)]
struct Context<'a> {
    parent: Option<&'a Node>,
    list_depth: usize,
}

impl<'a> Context<'a> {
    fn under(node: &'a Node, list_depth: usize) -> Self {
        Self {
            parent: Some(node),
            list_depth,
        }
    }
}

/// Walks a subtree and produces Markdown.
pub struct MarkdownSerializer<'a> {
    rules: &'a Rules,
    options: &'a MarkdownOptions,
}

impl<'a> MarkdownSerializer<'a> {
    pub fn new(rules: &'a Rules, options: &'a MarkdownOptions) -> Self {
        Self { rules, options }
    }

    /// Convert `root` and everything below it
    pub fn serialize(&self, root: &'a Node) -> String {
        self.serialize_with_parent(root, None)
    }

    /// Convert `root` as it sits under `parent` in the full tree. Handlers that
    /// look at their parent (`code` inside `pre`) see it for the root too.
    pub fn serialize_with_parent(&self, root: &'a Node, parent: Option<&'a Node>) -> String {
        let mut out = Fragments::new();
        let ctx = Context {
            parent,
            list_depth: 0,
        };
        self.walk(root, ctx, &mut out);
        out.finish()
    }

    fn walk(&self, node: &'a Node, ctx: Context<'a>, out: &mut Fragments<'a>) {
        match node.node_type {
            NodeType::Text => {
                let text = node.node_value.as_deref().unwrap_or_default();
                if !text.trim().is_empty() {
                    out.push(text);
                }
            }
            NodeType::Element => self.walk_element(node, ctx, out),
            NodeType::Document | NodeType::DocumentFragment => {
                self.walk_children(node, ctx.list_depth, out)
            }
            NodeType::Comment => {}
        }
    }

    fn walk_children(&self, node: &'a Node, list_depth: usize, out: &mut Fragments<'a>) {
        let ctx = Context::under(node, list_depth);
        for child in node.children() {
            self.walk(child, ctx, out);
        }
    }

    fn walk_element(&self, node: &'a Node, ctx: Context<'a>, out: &mut Fragments<'a>) {
        let tag = node.tag_name();
        let handler = self.rules.for_tag(&tag);

        if *handler == Handler::Skip {
            tracing::trace!(%tag, "skipping non-content element");
            return;
        }
        if !node.is_rendered() {
            tracing::trace!(%tag, "skipping hidden element");
            return;
        }

        let depth = ctx.list_depth;
        match handler {
            Handler::Heading(level) => {
                out.push("\n");
                out.push(format!("{} ", "#".repeat(usize::from(*level))));
                self.walk_children(node, depth, out);
                out.push("\n\n");
            }
            Handler::Paragraph => {
                self.walk_children(node, depth, out);
                out.push("\n\n");
            }
            Handler::LineBreak => out.push("\n"),
            Handler::Wrap { open, close } => {
                out.push(open.as_str());
                self.walk_children(node, depth, out);
                out.push(close.as_str());
            }
            Handler::Code => {
                if ctx.parent.is_some_and(|p| p.is_tag("pre")) {
                    self.walk_children(node, depth, out);
                } else {
                    out.push("`");
                    self.walk_children(node, depth, out);
                    out.push("`");
                }
            }
            Handler::CodeBlock => {
                let fence = self.options.fence.as_str();
                let language = code_language(node).unwrap_or_default();
                out.push(format!("\n{}{}\n", fence, language));
                self.walk_children(node, depth, out);
                out.push(format!("\n{}\n\n", fence));
            }
            Handler::Blockquote => self.blockquote(node, depth, out),
            Handler::Link => match node.attr("href").filter(|href| is_followable(href)) {
                Some(href) => {
                    out.push("[");
                    self.walk_children(node, depth, out);
                    out.push("](");
                    out.push(href);
                    out.push(")");
                }
                None => self.walk_children(node, depth, out),
            },
            Handler::Image => {
                if let Some(src) = node.attr("src").filter(|src| !src.is_empty()) {
                    let alt = node.attr("alt").unwrap_or_default();
                    out.push(format!("![{}]({})", alt, src));
                }
            }
            Handler::List { ordered } => self.list(node, *ordered, depth, out),
            Handler::ThematicBreak => {
                out.push("\n");
                out.push(self.options.hr.as_str());
                out.push("\n\n");
            }
            Handler::Table => table(node, out),
            Handler::Keep => out.push(node.outer_html()),
            Handler::Skip => {}
            Handler::Passthrough => self.walk_children(node, depth, out),
        }
    }

    fn blockquote(&self, node: &'a Node, depth: usize, out: &mut Fragments<'a>) {
        match self.options.blockquote_style {
            BlockquoteStyle::FirstLine => {
                out.push("\n> ");
                self.walk_children(node, depth, out);
                out.push("\n\n");
            }
            BlockquoteStyle::EveryLine => {
                let mark = out.len();
                self.walk_children(node, depth, out);
                let inner = collapse_blank_lines(out.take_from(mark).trim());
                if inner.is_empty() {
                    return;
                }

                let quoted: Vec<String> = inner
                    .lines()
                    .map(|line| {
                        if line.trim().is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {}", line)
                        }
                    })
                    .collect();
                out.push("\n");
                out.push(quoted.join("\n"));
                out.push("\n\n");
            }
        }
    }

    fn list(&self, node: &'a Node, ordered: bool, depth: usize, out: &mut Fragments<'a>) {
        let indent = self.options.list_indent.repeat(depth);
        let mut number = 0usize;

        out.push("\n");
        for item in node.element_children().filter(|child| child.is_tag("li")) {
            if !item.is_rendered() {
                continue;
            }
            number += 1;

            out.push(indent.clone());
            if ordered {
                out.push(format!("{}. ", number));
            } else {
                out.push(format!("{} ", self.options.bullet_list_marker));
            }
            self.walk_children(item, depth + 1, out);
            if !out.at_line_start() {
                out.push("\n");
            }
        }

        if depth == 0 {
            out.push("\n");
        }
    }
}

/// Emit every descendant row as a pipe-table row; the first row is the header.
fn table(node: &Node, out: &mut Fragments<'_>) {
    out.push("\n");
    for (index, row) in node.descendants().filter(|n| n.is_tag("tr")).enumerate() {
        let cells: Vec<String> = row
            .descendants()
            .filter(|n| n.is_tag("th") || n.is_tag("td"))
            .map(|cell| escape_table_cell(cell.text_content().trim()))
            .collect();

        out.push(format!("| {} |\n", cells.join(" | ")));
        if index == 0 {
            out.push(format!("| {} |\n", vec!["---"; cells.len()].join(" | ")));
        }
    }
    out.push("\n");
}

/// Language hint from the first descendant `<code class="language-xxx">`.
///
/// A class without a recognizable hint means no language.
pub fn code_language(pre: &Node) -> Option<&str> {
    let code = pre.descendants().find(|n| n.is_tag("code"))?;
    let class = code.attr("class")?;
    let hint = LANGUAGE_HINT
        .captures(class)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str());
    if hint.is_none() {
        tracing::trace!(class, "no language hint in code class");
    }
    hint
}

/// Links whose target is empty or runs script are emitted as bare text.
pub fn is_followable(href: &str) -> bool {
    let href = href.trim_start();
    if href.is_empty() {
        return false;
    }
    let scheme = href.get(..11);
    !scheme.is_some_and(|s| s.eq_ignore_ascii_case("javascript:"))
}
