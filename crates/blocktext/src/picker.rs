//! Element picking: from the node under the pointer to the block worth
//! extracting.

use crate::node::{Node, NodePath};
use crate::options::PickerOptions;

/// The element chosen by [`ElementPicker::pick`]
#[derive(Debug, Clone, PartialEq)]
pub struct Picked<'a> {
    pub node: &'a Node,
    pub path: NodePath,
}

/// Nearest-qualifying-ancestor search.
pub struct ElementPicker<'o> {
    options: &'o PickerOptions,
}

impl<'o> ElementPicker<'o> {
    pub fn new(options: &'o PickerOptions) -> Self {
        Self { options }
    }

    /// Walk upward from `target` (inclusive) to the first element that is big
    /// enough to be a meaningful block.
    ///
    /// Returns `None` when the walk reaches `html`/`body`, hits an excluded or
    /// injected element, or runs out of ancestors. Elements that are too small
    /// hand the decision to their parent.
    pub fn pick<'a>(&self, root: &'a Node, target: &NodePath) -> Option<Picked<'a>> {
        let chain = root.ancestry(target)?;

        for (depth, node) in chain.iter().copied().enumerate().rev() {
            if !node.is_element() {
                continue;
            }
            if node.is_tag("html") || node.is_tag("body") {
                tracing::trace!("reached document root without a candidate");
                return None;
            }
            if !self.is_large_enough(node) {
                tracing::trace!(tag = %node.node_name, "too small, trying parent");
                continue;
            }
            if self.is_excluded(node) {
                tracing::trace!(tag = %node.node_name, "excluded element");
                return None;
            }

            let path = NodePath::from_indices(target.indices()[..depth].iter().copied());
            return Some(Picked { node, path });
        }

        None
    }

    fn is_large_enough(&self, node: &Node) -> bool {
        node.layout.is_some_and(|rect| {
            rect.width >= self.options.min_width && rect.height >= self.options.min_height
        })
    }

    fn is_excluded(&self, node: &Node) -> bool {
        let excluded_tag = self
            .options
            .excluded_tags
            .iter()
            .any(|tag| node.is_tag(tag));
        let injected = node
            .attr("id")
            .is_some_and(|id| self.options.injected_ids.iter().any(|i| i == id));
        excluded_tag || injected
    }
}

/// Path of the deepest rendered element whose box contains the point.
///
/// Later siblings are tested first, since they paint on top. Elements without
/// a layout box never match themselves but their children are still searched.
pub fn hit_test(root: &Node, x: f64, y: f64) -> Option<NodePath> {
    hit(root, NodePath::root(), x, y)
}

fn hit(node: &Node, path: NodePath, x: f64, y: f64) -> Option<NodePath> {
    if !node.is_element() || !node.is_rendered() {
        return None;
    }

    if let Some(children) = &node.children {
        for (index, child) in children.iter().enumerate().rev() {
            if let Some(found) = hit(child, path.child(index), x, y) {
                return Some(found);
            }
        }
    }

    match node.layout {
        Some(rect) if rect.contains(x, y) => Some(path),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Rect;

    fn boxed(tag: &str, w: f64, h: f64) -> Node {
        Node::element(tag).with_layout(Rect::new(0.0, 0.0, w, h))
    }

    fn page(content: Node) -> Node {
        boxed("html", 1000.0, 1000.0).with_child(boxed("body", 1000.0, 1000.0).with_child(content))
    }

    #[test]
    fn test_small_target_yields_ancestor() {
        let root = page(boxed("div", 200.0, 200.0).with_child(boxed("span", 5.0, 5.0)));
        let options = PickerOptions::default();
        let picked = ElementPicker::new(&options)
            .pick(&root, &NodePath::from_indices([0, 0, 0]))
            .unwrap();
        assert!(picked.node.is_tag("div"));
        assert_eq!(picked.path, NodePath::from_indices([0, 0]));
    }

    #[test]
    fn test_large_target_is_itself() {
        let root = page(boxed("div", 200.0, 200.0).with_child(boxed("p", 180.0, 40.0)));
        let options = PickerOptions::default();
        let picked = ElementPicker::new(&options)
            .pick(&root, &NodePath::from_indices([0, 0, 0]))
            .unwrap();
        assert!(picked.node.is_tag("p"));
    }

    #[test]
    fn test_text_target_starts_at_parent() {
        let root = page(boxed("p", 180.0, 40.0).with_child(Node::text("hi")));
        let options = PickerOptions::default();
        let picked = ElementPicker::new(&options)
            .pick(&root, &NodePath::from_indices([0, 0, 0]))
            .unwrap();
        assert!(picked.node.is_tag("p"));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let options = PickerOptions::default();
        let picker = ElementPicker::new(&options);

        let exact = page(boxed("p", 24.0, 12.0));
        assert!(picker.pick(&exact, &NodePath::from_indices([0, 0])).is_some());

        let narrow = page(boxed("p", 23.9, 100.0));
        assert!(picker.pick(&narrow, &NodePath::from_indices([0, 0])).is_none());
    }

    #[test]
    fn test_body_and_html_never_picked() {
        let options = PickerOptions::default();
        let picker = ElementPicker::new(&options);
        let root = page(boxed("span", 2.0, 2.0));

        assert!(picker.pick(&root, &NodePath::from_indices([0, 0])).is_none());
        assert!(picker.pick(&root, &NodePath::from_indices([0])).is_none());
        assert!(picker.pick(&root, &NodePath::root()).is_none());
    }

    #[test]
    fn test_excluded_and_injected_elements() {
        let options = PickerOptions::default();
        let picker = ElementPicker::new(&options);

        let style = page(boxed("div", 200.0, 200.0).with_child(boxed("style", 100.0, 100.0)));
        assert!(picker.pick(&style, &NodePath::from_indices([0, 0, 0])).is_none());

        let mut overlay = boxed("div", 300.0, 300.0);
        overlay.set_attr("id", "bte-overlay");
        let root = page(overlay);
        assert!(picker.pick(&root, &NodePath::from_indices([0, 0])).is_none());
    }

    #[test]
    fn test_missing_layout_counts_as_too_small() {
        let options = PickerOptions::default();
        let root = page(boxed("div", 200.0, 200.0).with_child(Node::element("em")));
        let picked = ElementPicker::new(&options)
            .pick(&root, &NodePath::from_indices([0, 0, 0]))
            .unwrap();
        assert!(picked.node.is_tag("div"));
    }

    #[test]
    fn test_custom_thresholds() {
        let options = PickerOptions {
            min_width: 2.0,
            min_height: 2.0,
            ..Default::default()
        };
        let root = page(boxed("div", 200.0, 200.0).with_child(boxed("span", 5.0, 5.0)));
        let picked = ElementPicker::new(&options)
            .pick(&root, &NodePath::from_indices([0, 0, 0]))
            .unwrap();
        assert!(picked.node.is_tag("span"));
    }

    #[test]
    fn test_unresolvable_path() {
        let options = PickerOptions::default();
        let root = page(boxed("div", 200.0, 200.0));
        assert!(ElementPicker::new(&options)
            .pick(&root, &NodePath::from_indices([0, 7]))
            .is_none());
    }

    #[test]
    fn test_hit_test_prefers_deepest_and_topmost() {
        let first = Node::element("p").with_layout(Rect::new(0.0, 0.0, 100.0, 50.0));
        let overlapping = Node::element("p").with_layout(Rect::new(50.0, 0.0, 100.0, 50.0));
        let root = Node::element("div")
            .with_layout(Rect::new(0.0, 0.0, 500.0, 500.0))
            .with_child(first)
            .with_child(overlapping);

        assert_eq!(hit_test(&root, 10.0, 10.0), Some(NodePath::from_indices([0])));
        assert_eq!(hit_test(&root, 75.0, 10.0), Some(NodePath::from_indices([1])));
        assert_eq!(hit_test(&root, 400.0, 400.0), Some(NodePath::root()));
        assert_eq!(hit_test(&root, 900.0, 900.0), None);
    }

    #[test]
    fn test_hit_test_skips_hidden_and_searches_unboxed() {
        let hidden = Node::element("p")
            .with_layout(Rect::new(0.0, 0.0, 100.0, 100.0))
            .with_style(&[("display", "none")]);
        let unboxed = Node::element("span").with_child(
            Node::element("b").with_layout(Rect::new(200.0, 200.0, 10.0, 10.0)),
        );
        let root = Node::element("div").with_child(hidden).with_child(unboxed);

        assert_eq!(hit_test(&root, 50.0, 50.0), None);
        assert_eq!(hit_test(&root, 205.0, 205.0), Some(NodePath::from_indices([1, 0])));
    }
}
