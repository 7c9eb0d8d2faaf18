//! Extension registry: per-tag handlers, hooks and parse-time syntaxes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use markview_ast::Node;
use markview_parser::{BlockSyntax, InlineSyntax, ParseOptions};

use crate::image::ImageSource;
use crate::render_node::RenderNode;
use crate::style::TextStyle;

/// Signal returned by [`ElementHandler::before`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeforeVisit {
    /// Visit children and then call [`ElementHandler::after`].
    #[default]
    Continue,
    /// Skip the children and `after`; the element renders nothing.
    Skip,
}

/// A handler that intercepts one tag during the build walk.
///
/// A registered handler always takes precedence over the built-in rule for
/// its tag. Returning `None` from [`after`](Self::after) falls back to the
/// built-in rule with the already-built children.
///
/// # Example
///
/// ```rust
/// use markview_ast::Node;
/// use markview_render::{ElementHandler, RenderNode, TextStyle};
///
/// struct Shout;
///
/// impl ElementHandler for Shout {
///     fn visit_text(&self, text: &str, style: &TextStyle) -> Option<RenderNode> {
///         Some(RenderNode::text(text.to_uppercase(), style.clone()))
///     }
///
///     fn after(&self, _: &Node, _: &[RenderNode], _: &TextStyle) -> Option<RenderNode> {
///         None
///     }
/// }
/// ```
pub trait ElementHandler: Send + Sync {
    /// Called before the element's children are visited.
    fn before(&self, _element: &Node) -> BeforeVisit {
        BeforeVisit::Continue
    }

    /// Renders a text leaf whose nearest handled ancestor is this element.
    ///
    /// Returning `None` applies the default text rule.
    fn visit_text(&self, _text: &str, _style: &TextStyle) -> Option<RenderNode> {
        None
    }

    /// Produces the element's output from its built children.
    fn after(&self, element: &Node, children: &[RenderNode], style: &TextStyle) -> Option<RenderNode>;
}

/// Input handed to an [`ImageHandler`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Resolved URI.
    pub uri: String,
    pub source: ImageSource,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Position of a list item, handed to a [`BulletHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletContext {
    /// Position within the list, starting at 0.
    pub index: usize,
    /// Displayed number for ordered lists (`start + index`).
    pub number: u64,
    pub ordered: bool,
    /// List nesting depth, starting at 0.
    pub depth: usize,
}

pub type ImageHandler = Arc<dyn Fn(&ImageRequest) -> RenderNode + Send + Sync>;
pub type CheckboxHandler = Arc<dyn Fn(bool) -> RenderNode + Send + Sync>;
pub type BulletHandler = Arc<dyn Fn(&BulletContext) -> RenderNode + Send + Sync>;

/// Host-supplied extensions consulted during the build walk.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    handlers: HashMap<String, Arc<dyn ElementHandler>>,
    image_handler: Option<ImageHandler>,
    checkbox_handler: Option<CheckboxHandler>,
    bullet_handler: Option<BulletHandler>,
    inline_syntaxes: Vec<Arc<dyn InlineSyntax>>,
    block_syntaxes: Vec<Arc<dyn BlockSyntax>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `tag`, replacing any previous handler.
    pub fn register(&mut self, tag: impl Into<String>, handler: Arc<dyn ElementHandler>) {
        let tag = tag.into();
        if self.handlers.insert(tag.clone(), handler).is_some() {
            tracing::debug!(tag = %tag, "replaced element handler");
        } else {
            tracing::debug!(tag = %tag, "registered element handler");
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_handler(mut self, tag: impl Into<String>, handler: impl ElementHandler + 'static) -> Self {
        self.register(tag, Arc::new(handler));
        self
    }

    pub fn with_image_handler(mut self, handler: impl Fn(&ImageRequest) -> RenderNode + Send + Sync + 'static) -> Self {
        self.image_handler = Some(Arc::new(handler));
        self
    }

    pub fn with_checkbox_handler(mut self, handler: impl Fn(bool) -> RenderNode + Send + Sync + 'static) -> Self {
        self.checkbox_handler = Some(Arc::new(handler));
        self
    }

    pub fn with_bullet_handler(
        mut self,
        handler: impl Fn(&BulletContext) -> RenderNode + Send + Sync + 'static,
    ) -> Self {
        self.bullet_handler = Some(Arc::new(handler));
        self
    }

    pub fn with_inline_syntax(mut self, syntax: impl InlineSyntax + 'static) -> Self {
        self.inline_syntaxes.push(Arc::new(syntax));
        self
    }

    pub fn with_block_syntax(mut self, syntax: impl BlockSyntax + 'static) -> Self {
        self.block_syntaxes.push(Arc::new(syntax));
        self
    }

    /// Looks up the handler for `tag`.
    #[inline]
    pub fn handler(&self, tag: &str) -> Option<&dyn ElementHandler> {
        self.handlers.get(tag).map(Arc::as_ref)
    }

    pub fn image_handler(&self) -> Option<&ImageHandler> {
        self.image_handler.as_ref()
    }

    pub fn checkbox_handler(&self) -> Option<&CheckboxHandler> {
        self.checkbox_handler.as_ref()
    }

    pub fn bullet_handler(&self) -> Option<&BulletHandler> {
        self.bullet_handler.as_ref()
    }

    /// Number of registered element handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Parser configuration carrying the registered syntaxes.
    ///
    /// The syntaxes are only used at parse time; the build walk never
    /// invokes them.
    pub fn parse_options(&self, encode_html: bool) -> ParseOptions {
        ParseOptions {
            encode_html,
            inline_syntaxes: self.inline_syntaxes.clone(),
            block_syntaxes: self.block_syntaxes.clone(),
            ..ParseOptions::default()
        }
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("ExtensionRegistry")
            .field("handlers", &tags)
            .field("image_handler", &self.image_handler.is_some())
            .field("checkbox_handler", &self.checkbox_handler.is_some())
            .field("bullet_handler", &self.bullet_handler.is_some())
            .field("inline_syntaxes", &self.inline_syntaxes.len())
            .field("block_syntaxes", &self.block_syntaxes.len())
            .finish()
    }
}
