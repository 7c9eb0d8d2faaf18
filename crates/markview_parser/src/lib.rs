//! # markview_parser
//!
//! Converts Markdown source into the markview document tree.
//!
//! This crate provides:
//! - A `Parser` trait for plugging in other markup languages
//! - A Markdown parser built on `markdown-rs` (GFM)
//! - Custom inline and block syntaxes applied on top of the Markdown grammar
//!
//! ## Example
//!
//! ```rust
//! use markview_parser::{MarkdownParser, Parser};
//!
//! let parser = MarkdownParser::new();
//! let nodes = parser.parse("# Hello\n\nThis is a paragraph.").unwrap();
//!
//! assert_eq!(nodes.len(), 2);
//! assert_eq!(nodes[0].tag(), Some("h1"));
//! assert_eq!(nodes[1].tag(), Some("p"));
//! ```

mod error;
mod markdown;
mod syntax;
mod traits;

pub use error::ParseError;
pub use self::markdown::{MarkdownParser, ParseOptions};
pub use syntax::{BlockSyntax, InlineSyntax};
pub use traits::Parser;
