//! Interactive selection: highlight on hover, extract on click.

use blocktext::{
    hit_test, ConvertOptions, Converter, ExtractError, Extraction, Format, Node, NodePath, Rect,
};

/// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Page input, in viewport CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    KeyDown(Key),
}

/// What the host should do after an event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Move the highlight overlay to this element
    Highlight { path: NodePath, rect: Rect },
    /// Nothing changed
    Idle,
    /// Selection finished with a result; copy it
    Extracted(Extraction),
    /// Selection finished without a result
    Failed(ExtractError),
    /// Selection was aborted by the user
    Cancelled,
}

impl Outcome {
    /// The success signal reported back to the host
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Extracted(_))
    }
}

/// Selection state machine for one page.
#[derive(Debug, Default)]
pub struct SelectionSession {
    converter: Converter,
    format: Format,
    selecting: bool,
    highlighted: Option<NodePath>,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            converter: Converter::with_options(options),
            ..Self::default()
        }
    }

    /// Begin selecting. Returns `false` if a selection is already running.
    pub fn start(&mut self, format: Format) -> bool {
        if self.selecting {
            return false;
        }
        tracing::debug!(%format, "selection started");
        self.selecting = true;
        self.format = format;
        self.highlighted = None;
        true
    }

    pub fn stop(&mut self) {
        self.selecting = false;
        self.highlighted = None;
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Path of the element currently highlighted, if any
    pub fn highlighted(&self) -> Option<&NodePath> {
        self.highlighted.as_ref()
    }

    pub fn handle(&mut self, root: &Node, event: InputEvent) -> Outcome {
        if !self.selecting {
            return Outcome::Idle;
        }

        match event {
            InputEvent::PointerMove { x, y } => self.hover(root, x, y),
            InputEvent::Click { x, y } => {
                let outcome = match self.extract_at(root, x, y) {
                    Ok(extraction) => {
                        tracing::debug!(summary = %extraction.summary(), "extracted block");
                        Outcome::Extracted(extraction)
                    }
                    Err(error) => {
                        tracing::debug!(%error, "extraction failed");
                        Outcome::Failed(error)
                    }
                };
                self.stop();
                outcome
            }
            InputEvent::KeyDown(Key::Escape) => {
                tracing::debug!("selection cancelled");
                self.stop();
                Outcome::Cancelled
            }
            InputEvent::KeyDown(Key::Other) => Outcome::Idle,
        }
    }

    fn hover(&mut self, root: &Node, x: f64, y: f64) -> Outcome {
        let candidate = hit_test(root, x, y).and_then(|target| self.converter.pick(root, &target).ok());

        let Some(picked) = candidate else {
            self.highlighted = None;
            return Outcome::Idle;
        };
        if self.highlighted.as_ref() == Some(&picked.path) {
            return Outcome::Idle;
        }

        let rect = picked.node.layout.unwrap_or_default();
        self.highlighted = Some(picked.path.clone());
        Outcome::Highlight {
            path: picked.path,
            rect,
        }
    }

    fn extract_at(&self, root: &Node, x: f64, y: f64) -> blocktext::Result<Extraction> {
        let target = hit_test(root, x, y).ok_or(ExtractError::NoCandidateElement)?;
        let picked = self.converter.pick(root, &target)?;
        self.converter.extract_at(root, &picked.path, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Node {
        Node::element("body")
            .with_layout(Rect::new(0.0, 0.0, 800.0, 600.0))
            .with_child(
                Node::element("p")
                    .with_layout(Rect::new(0.0, 0.0, 400.0, 40.0))
                    .with_child(Node::text("Some ")),
            )
    }

    #[test]
    fn test_start_twice() {
        let mut session = SelectionSession::new();
        assert!(session.start(Format::Markdown));
        assert!(!session.start(Format::PlainText));
        assert_eq!(session.format(), Format::Markdown);

        session.stop();
        assert!(session.start(Format::PlainText));
    }

    #[test]
    fn test_idle_when_not_selecting() {
        let mut session = SelectionSession::new();
        let outcome = session.handle(&page(), InputEvent::Click { x: 5.0, y: 5.0 });
        assert_eq!(outcome, Outcome::Idle);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut session = SelectionSession::new();
        session.start(Format::PlainText);
        assert_eq!(session.handle(&page(), InputEvent::KeyDown(Key::Other)), Outcome::Idle);
        assert!(session.is_selecting());
    }

    #[test]
    fn test_highlight_clears_outside() {
        let mut session = SelectionSession::new();
        session.start(Format::PlainText);

        let outcome = session.handle(&page(), InputEvent::PointerMove { x: 5.0, y: 5.0 });
        assert!(matches!(outcome, Outcome::Highlight { .. }));
        assert_eq!(session.highlighted(), Some(&NodePath::from_indices([0])));

        let outcome = session.handle(&page(), InputEvent::PointerMove { x: 500.0, y: 500.0 });
        assert_eq!(outcome, Outcome::Idle);
        assert_eq!(session.highlighted(), None);
    }

    #[test]
    fn test_set_format_applies_to_click() {
        let mut session = SelectionSession::new();
        session.start(Format::PlainText);
        session.set_format(Format::Markdown);

        let outcome = session.handle(&page(), InputEvent::Click { x: 5.0, y: 5.0 });
        match outcome {
            Outcome::Extracted(extraction) => {
                assert_eq!(extraction.format(), Format::Markdown);
                assert_eq!(extraction.text(), "Some");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
