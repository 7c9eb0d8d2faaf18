//! Visitor trait for traversing document nodes.

use std::ops::ControlFlow;

use crate::Node;

use super::walk::walk_children;

/// Result type for visitor methods to control traversal.
///
/// - `ControlFlow::Continue(())` - continue traversal
/// - `ControlFlow::Break(())` - stop traversal early
pub type VisitResult = ControlFlow<()>;

/// Visitor trait for traversing a document tree without modification.
///
/// The default `visit_element` walks children, so implementors only override
/// the hooks they care about.
pub trait Visitor {
    /// Called before an element is visited.
    fn enter_element(&mut self, _node: &Node) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after an element and its children were visited.
    fn exit_element(&mut self, _node: &Node) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Visits an element. Defaults to walking its children.
    fn visit_element(&mut self, node: &Node) -> VisitResult
    where
        Self: Sized,
    {
        walk_children(self, node)
    }

    /// Visits a text leaf.
    fn visit_text(&mut self, _content: &str) -> VisitResult {
        ControlFlow::Continue(())
    }
}
