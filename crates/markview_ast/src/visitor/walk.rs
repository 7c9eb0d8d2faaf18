//! Walk functions for tree traversal.

use crate::Node;

use super::visit::{VisitResult, Visitor};

/// Walks a node.
///
/// For elements this calls `enter_element`, `visit_element` and
/// `exit_element` in order, stopping as soon as one of them breaks.
pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) -> VisitResult {
    match node {
        Node::Text { content } => visitor.visit_text(content),
        Node::Element { .. } => {
            visitor.enter_element(node)?;
            visitor.visit_element(node)?;
            visitor.exit_element(node)
        }
    }
}

/// Walks all children of a node in document order.
pub fn walk_children<V: Visitor>(visitor: &mut V, node: &Node) -> VisitResult {
    for child in node.children() {
        walk_node(visitor, child)?;
    }
    std::ops::ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;

    struct Recorder {
        events: Vec<String>,
        stop_at: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn enter_element(&mut self, node: &Node) -> VisitResult {
            let tag = node.tag().unwrap_or_default();
            self.events.push(format!("enter:{tag}"));
            if self.stop_at == Some(tag) {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        }

        fn exit_element(&mut self, node: &Node) -> VisitResult {
            self.events
                .push(format!("exit:{}", node.tag().unwrap_or_default()));
            ControlFlow::Continue(())
        }

        fn visit_text(&mut self, content: &str) -> VisitResult {
            self.events.push(format!("text:{content}"));
            ControlFlow::Continue(())
        }
    }

    fn sample() -> Node {
        Node::element(
            "p",
            vec![
                Node::text("a"),
                Node::element("em", vec![Node::text("b")]),
                Node::text("c"),
            ],
        )
    }

    #[test]
    fn test_walk_order() {
        let mut recorder = Recorder {
            events: Vec::new(),
            stop_at: None,
        };
        let result = walk_node(&mut recorder, &sample());

        assert_eq!(result, ControlFlow::Continue(()));
        assert_eq!(
            recorder.events,
            vec!["enter:p", "text:a", "enter:em", "text:b", "exit:em", "text:c", "exit:p"]
        );
    }

    #[test]
    fn test_walk_early_termination() {
        let mut recorder = Recorder {
            events: Vec::new(),
            stop_at: Some("em"),
        };
        let result = walk_node(&mut recorder, &sample());

        assert_eq!(result, ControlFlow::Break(()));
        assert_eq!(recorder.events, vec!["enter:p", "text:a", "enter:em"]);
    }
}
