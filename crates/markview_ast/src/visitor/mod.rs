//! Visitor pattern for document tree traversal.
//!
//! - [`Visitor`] - Read-only traversal trait
//! - [`walk_node`] - Dispatch function for a single node
//! - [`walk_children`] - Traverse all children of a node
//!
//! # Example
//!
//! ```rust
//! use markview_ast::Node;
//! use markview_ast::visitor::{Visitor, VisitResult, walk_node};
//! use std::ops::ControlFlow;
//!
//! struct LinkCollector {
//!     hrefs: Vec<String>,
//! }
//!
//! impl Visitor for LinkCollector {
//!     fn enter_element(&mut self, node: &Node) -> VisitResult {
//!         if let (Some("a"), Some(href)) = (node.tag(), node.attr("href")) {
//!             self.hrefs.push(href.to_string());
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let doc = Node::element("p", vec![
//!     Node::element("a", vec![Node::text("x")]).with_attr("href", "https://a.test"),
//! ]);
//!
//! let mut collector = LinkCollector { hrefs: Vec::new() };
//! let _ = walk_node(&mut collector, &doc);
//! assert_eq!(collector.hrefs, vec!["https://a.test"]);
//! ```

mod visit;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use walk::{walk_children, walk_node};
