//! Host adapter: one view, one document slot.

use std::fmt;
use std::sync::Arc;

use markview_ast::Node;

use crate::RenderError;
use crate::builder::{TreeBuilder, compose_root};
use crate::config::ViewConfig;
use crate::highlight::SyntaxHighlighter;
use crate::interaction::{InteractionManager, LinkCallback};
use crate::registry::ExtensionRegistry;
use crate::render_node::RenderNode;
use crate::style::{AmbientTheme, EdgeInsets, StyleConfig, merge, resolve_theme};

/// Space between top-level blocks when the style sheet leaves it unset.
const DEFAULT_BLOCK_SPACING: f32 = 8.0;

/// Renders one document into a cached render tree.
///
/// The view rebuilds only when it has never rendered, when the document or
/// style override is a different allocation than last time, or when the
/// ambient theme changes. Change detection is by identity: callers must pass
/// a new `Arc` when the content changes.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use markview_parser::{MarkdownParser, Parser};
/// use markview_render::{AmbientTheme, ExtensionRegistry, MarkdownView, ViewConfig};
///
/// let ast = Arc::new(MarkdownParser::new().parse("# Hello").unwrap());
/// let mut view = MarkdownView::new(ViewConfig::new(), ExtensionRegistry::new());
///
/// let root = view.render(Some(Arc::clone(&ast)), None, &AmbientTheme::light()).unwrap();
/// assert_eq!(root.plain_text(), "Hello");
///
/// view.render(Some(ast), None, &AmbientTheme::light()).unwrap();
/// assert_eq!(view.build_count(), 1);
/// ```
pub struct MarkdownView {
    config: ViewConfig,
    registry: ExtensionRegistry,
    highlighter: Option<Arc<dyn SyntaxHighlighter>>,
    on_tap_link: Option<LinkCallback>,
    interactions: InteractionManager,
    last_ast: Option<Arc<Vec<Node>>>,
    last_style: Option<Arc<StyleConfig>>,
    last_theme: Option<AmbientTheme>,
    output: Option<RenderNode>,
    dirty: bool,
    build_count: u64,
    disposed: bool,
}

impl MarkdownView {
    pub fn new(config: ViewConfig, registry: ExtensionRegistry) -> Self {
        Self {
            config,
            registry,
            highlighter: None,
            on_tap_link: None,
            interactions: InteractionManager::new(),
            last_ast: None,
            last_style: None,
            last_theme: None,
            output: None,
            dirty: false,
            build_count: 0,
            disposed: false,
        }
    }

    /// Sets the callback invoked with a link's target when it is tapped.
    ///
    /// Takes effect on the next render.
    pub fn set_on_tap_link(&mut self, callback: Option<LinkCallback>) {
        self.on_tap_link = callback;
        self.dirty = true;
    }

    /// Sets the code block highlighter. Takes effect on the next render.
    pub fn set_highlighter(&mut self, highlighter: Option<Arc<dyn SyntaxHighlighter>>) {
        self.highlighter = highlighter;
        self.dirty = true;
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Renders `ast`, rebuilding only when one of the inputs changed.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingAst`] when no document is supplied,
    /// [`RenderError::Disposed`] after [`dispose`](Self::dispose), and
    /// [`RenderError::Config`] for an invalid `base_url`.
    pub fn render(
        &mut self,
        ast: Option<Arc<Vec<Node>>>,
        style: Option<Arc<StyleConfig>>,
        theme: &AmbientTheme,
    ) -> Result<&RenderNode, RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        let ast = ast.ok_or(RenderError::MissingAst)?;

        if self.needs_rebuild(&ast, style.as_ref(), theme) {
            let root = self.rebuild(&ast, style.as_deref(), theme)?;
            self.output = Some(root);
            self.last_ast = Some(ast);
            self.last_style = style;
            self.last_theme = Some(theme.clone());
            self.dirty = false;
        } else {
            tracing::trace!("inputs unchanged, reusing render tree");
        }

        self.output.as_ref().ok_or(RenderError::MissingAst)
    }

    /// The last rendered tree, if any.
    pub fn output(&self) -> Option<&RenderNode> {
        self.output.as_ref()
    }

    /// Number of builds performed so far.
    pub fn build_count(&self) -> u64 {
        self.build_count
    }

    /// Number of link handles owned by the current tree.
    pub fn live_handles(&self) -> usize {
        self.interactions.live_count()
    }

    /// Tears the view down, releasing every link handle. Idempotent.
    pub fn dispose(&mut self) {
        if !self.disposed {
            tracing::debug!(builds = self.build_count, "disposing view");
        }
        self.interactions.dispose_all();
        self.output = None;
        self.last_ast = None;
        self.last_style = None;
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn needs_rebuild(&self, ast: &Arc<Vec<Node>>, style: Option<&Arc<StyleConfig>>, theme: &AmbientTheme) -> bool {
        if self.output.is_none() || self.dirty {
            return true;
        }
        let same_ast = self.last_ast.as_ref().is_some_and(|last| Arc::ptr_eq(last, ast));
        let same_style = match (&self.last_style, style) {
            (Some(last), Some(style)) => Arc::ptr_eq(last, style),
            (None, None) => true,
            _ => false,
        };
        let same_theme = self.last_theme.as_ref() == Some(theme);
        !(same_ast && same_style && same_theme)
    }

    fn rebuild(
        &mut self,
        ast: &[Node],
        style: Option<&StyleConfig>,
        theme: &AmbientTheme,
    ) -> Result<RenderNode, RenderError> {
        let options = self.config.build_options()?;
        self.interactions.dispose_all();

        let base = resolve_theme(self.config.theme, theme, self.config.platform);
        let configured = merge(&base, self.config.style.as_ref());
        let resolved = merge(&configured, style);

        let nodes = TreeBuilder::new(&resolved, &self.registry, &options, &mut self.interactions)
            .with_highlighter(self.highlighter.as_deref())
            .with_link_callback(self.on_tap_link.clone())
            .build(ast);

        let spacing = resolved.block_spacing.unwrap_or(DEFAULT_BLOCK_SPACING);
        let mut root = compose_root(nodes, options.fit_content, spacing);
        if self.config.scrollable {
            root = RenderNode::Scroll {
                padding: EdgeInsets::all(self.config.padding),
                child: Box::new(root),
            };
        }

        self.build_count += 1;
        tracing::debug!(
            build = self.build_count,
            links = self.interactions.live_count(),
            "rebuilt view"
        );
        Ok(root)
    }
}

impl Drop for MarkdownView {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for MarkdownView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownView")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("interactions", &self.interactions)
            .field("build_count", &self.build_count)
            .field("disposed", &self.disposed)
            .finish()
    }
}
