//! # markview_render
//!
//! Turns a markview document tree into a styled, host-agnostic render tree.
//!
//! This crate provides:
//! - [`StyleConfig`] with theme-derived defaults and a field-by-field [`merge`]
//! - [`ExtensionRegistry`] for per-tag handlers, image/checkbox/bullet hooks and
//!   parse-time syntaxes
//! - [`TreeBuilder`], the recursive document-to-[`RenderNode`] transform
//! - [`InteractionManager`], which owns the tap handles of links
//! - [`MarkdownView`], which caches the tree and rebuilds on identity change
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use markview_parser::{MarkdownParser, Parser};
//! use markview_render::{AmbientTheme, ExtensionRegistry, MarkdownView, RenderNode, ViewConfig};
//!
//! let registry = ExtensionRegistry::new();
//! let parser = MarkdownParser::with_options(registry.parse_options(false));
//! let ast = Arc::new(parser.parse("See [docs](https://example.test).\n\n---").unwrap());
//!
//! let mut view = MarkdownView::new(ViewConfig::new(), registry);
//! let root = view.render(Some(ast), None, &AmbientTheme::light()).unwrap();
//!
//! assert!(matches!(root, RenderNode::Column { .. }));
//! assert_eq!(root.link_handles().len(), 1);
//! ```

mod adapter;
mod builder;
mod config;
mod error;
mod highlight;
mod image;
mod interaction;
mod registry;
mod render_node;
pub mod style;

pub use adapter::MarkdownView;
pub use builder::{BuildOptions, TreeBuilder, compose_root};
pub use config::{CONFIG_FILE_NAME, ViewConfig};
pub use error::RenderError;
pub use highlight::SyntaxHighlighter;
pub use image::{ImageSource, ResolvedImage, resolve_image};
pub use interaction::{InteractionManager, LinkCallback, TapHandle};
pub use registry::{
    BeforeVisit, BulletContext, BulletHandler, CheckboxHandler, ElementHandler, ExtensionRegistry, ImageHandler,
    ImageRequest,
};
pub use render_node::{
    BlockKind, BlockNode, CheckboxNode, ImageNode, LinkNode, ListItemNode, ListNode, RenderNode, TableNode, TextSpan,
};
pub use style::{AmbientTheme, Role, StyleConfig, TextStyle, ThemeKind, merge, resolve_theme};
