//! Host integration for blocktext.
//!
//! A host (browser extension, automation driver) injects this layer once per
//! page and feeds it input events against the current DOM snapshot:
//!
//! ```rust
//! use blocktext::{Format, Node, Rect};
//! use blocktext_host::{InputEvent, Outcome, SelectionSession};
//!
//! let page = Node::element("body")
//!     .with_layout(Rect::new(0.0, 0.0, 800.0, 600.0))
//!     .with_child(
//!         Node::element("p")
//!             .with_layout(Rect::new(0.0, 0.0, 300.0, 40.0))
//!             .with_child(Node::text("Hello there")),
//!     );
//!
//! let mut session = SelectionSession::new();
//! assert!(session.start(Format::PlainText));
//!
//! match session.handle(&page, InputEvent::Click { x: 10.0, y: 10.0 }) {
//!     Outcome::Extracted(extraction) => assert_eq!(extraction.text(), "Hello there"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! assert!(!session.is_selecting());
//! ```

mod session;

use once_cell::sync::OnceCell;

pub use session::{InputEvent, Key, Outcome, SelectionSession};

static ACTIVATED: OnceCell<()> = OnceCell::new();

/// Claim the process-wide activation. Only the first call returns `true`;
/// later injections must not install a second set of listeners.
pub fn activate() -> bool {
    let first = ACTIVATED.set(()).is_ok();
    if !first {
        tracing::debug!("already active, ignoring repeated activation");
    }
    first
}
