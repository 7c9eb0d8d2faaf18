//! # markview_ast
//!
//! Document tree definitions for markview.
//!
//! A parsed document is an ordered list of [`Node`]s. Every node is either a
//! text leaf or a tagged element carrying string attributes and ordered
//! children. Tag names follow the HTML vocabulary (`p`, `h1`, `a`, `img`, ...)
//! so that parsers for other markup languages can target the same renderer.
//!
//! ## Example
//!
//! ```rust
//! use markview_ast::{Node, text_content};
//!
//! let link = Node::element("a", vec![Node::text("click")])
//!     .with_attr("href", "https://example.test");
//!
//! assert_eq!(link.tag(), Some("a"));
//! assert_eq!(link.attr("href"), Some("https://example.test"));
//! assert_eq!(text_content(&link), "click");
//! ```

mod node;
pub mod visitor;

pub use node::{Attributes, Node, text_content};

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor};
