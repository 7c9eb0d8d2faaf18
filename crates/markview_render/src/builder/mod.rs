//! The tree builder: document nodes in, render nodes out.
//!
//! The builder walks the document depth first, in document order. For each
//! element it consults the [`ExtensionRegistry`] before falling back to the
//! built-in rules, and it threads an inherited [`BuildContext`] down the
//! recursion for ambient text style, list nesting and table position.
//!
//! Malformed input never fails a build. Unknown tags render their children
//! inline, and unparseable attributes fall back to their defaults.

mod context;

use std::borrow::Cow;
use std::path::PathBuf;

use markview_ast::{Node, text_content};
use url::Url;

use crate::highlight::SyntaxHighlighter;
use crate::image::resolve_image;
use crate::interaction::{InteractionManager, LinkCallback};
use crate::registry::{BeforeVisit, BulletContext, ExtensionRegistry, ImageRequest};
use crate::render_node::{
    BlockKind, BlockNode, CheckboxNode, ImageNode, LinkNode, ListItemNode, ListNode, RenderNode, TableNode, TextSpan,
};
use crate::style::{Merge, Role, StyleConfig, TextAlign, TextStyle};

use self::context::BuildContext;

/// Indent per list level when the style sheet leaves it unset.
const DEFAULT_LIST_INDENT: f32 = 24.0;

/// Tags that render their children inline without any wrapper.
const INLINE_TAGS: &[&str] = &[
    "em", "strong", "del", "code", "i", "b", "s", "span", "sup", "sub", "thead", "tbody",
];

/// Document-independent build settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOptions {
    /// Base for scheme-relative and bare image paths.
    pub base_url: Option<Url>,
    /// Directory bare image paths are resolved against when no base URL is set.
    pub image_directory: Option<PathBuf>,
    /// Render soft line breaks inside paragraphs as hard breaks.
    pub soft_line_break: bool,
    /// Mark text blocks as selectable.
    pub selectable: bool,
    /// Size the root to its content instead of stretching to the available width.
    pub fit_content: bool,
}

/// Builds one render tree from a document.
pub struct TreeBuilder<'a> {
    style: &'a StyleConfig,
    registry: &'a ExtensionRegistry,
    options: &'a BuildOptions,
    highlighter: Option<&'a dyn SyntaxHighlighter>,
    on_tap_link: Option<LinkCallback>,
    interactions: &'a mut InteractionManager,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        style: &'a StyleConfig,
        registry: &'a ExtensionRegistry,
        options: &'a BuildOptions,
        interactions: &'a mut InteractionManager,
    ) -> Self {
        Self {
            style,
            registry,
            options,
            highlighter: None,
            on_tap_link: None,
            interactions,
        }
    }

    /// Sets the code block highlighter.
    pub fn with_highlighter(mut self, highlighter: Option<&'a dyn SyntaxHighlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Sets the callback links invoke when tapped.
    pub fn with_link_callback(mut self, callback: Option<LinkCallback>) -> Self {
        self.on_tap_link = callback;
        self
    }

    /// Builds the top-level render nodes for `nodes`.
    ///
    /// Every link handle created by a previous build on the same
    /// [`InteractionManager`] is disposed first.
    pub fn build(&mut self, nodes: &[Node]) -> Vec<RenderNode> {
        self.interactions.dispose_all();

        let ctx = BuildContext::new(self.style.role(Role::Paragraph).text.clone());
        let out = self.build_children(nodes, &ctx);

        tracing::debug!(
            nodes = nodes.len(),
            top_level = out.len(),
            links = self.interactions.live_count(),
            "built render tree"
        );
        out
    }

    fn build_children(&mut self, nodes: &[Node], ctx: &BuildContext<'a>) -> Vec<RenderNode> {
        let mut out = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            out.extend(self.build_node(node, ctx, i + 1 == nodes.len()));
        }
        merge_adjacent_text(out)
    }

    fn build_node(&mut self, node: &Node, ctx: &BuildContext<'a>, last: bool) -> Vec<RenderNode> {
        match node {
            Node::Text { content } => self.build_text(content, ctx, last),
            Node::Element { tag, .. } => self.build_element(tag, node, ctx),
        }
    }

    /// Only the last text leaf of a parent drops its trailing newline; any
    /// other newline is a soft break.
    fn build_text(&self, content: &str, ctx: &BuildContext<'a>, last: bool) -> Vec<RenderNode> {
        let normalized = normalize_newlines(content);
        let text = match normalized.strip_suffix('\n') {
            Some(trimmed) if last => trimmed,
            _ => &*normalized,
        };
        if text.is_empty() {
            return Vec::new();
        }

        let style = self.span_style(ctx);
        if let Some(node) = ctx.text_handler.and_then(|handler| handler.visit_text(text, &style)) {
            return vec![node];
        }

        if !text.contains('\n') {
            return vec![RenderNode::text(text, style)];
        }
        if !self.options.soft_line_break {
            return vec![RenderNode::text(text.replace('\n', " "), style)];
        }

        let mut out = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push(RenderNode::LineBreak);
            }
            if !line.is_empty() {
                out.push(RenderNode::text(line, style.clone()));
            }
        }
        out
    }

    fn build_element(&mut self, tag: &str, node: &Node, ctx: &BuildContext<'a>) -> Vec<RenderNode> {
        let registry: &'a ExtensionRegistry = self.registry;
        let handler = registry.handler(tag);

        if let Some(handler) = handler {
            if handler.before(node) == BeforeVisit::Skip {
                tracing::debug!(tag, "element skipped by handler");
                return Vec::new();
            }
        }

        let mut inner = ctx.clone();
        if let Some(role) = role_for(tag, ctx) {
            inner.text_style = inner.text_style.merge(&self.style.role(role).text);
        }
        if handler.is_some() {
            inner.text_handler = handler;
        }

        let children = match tag {
            "pre" if handler.is_none() => Vec::new(),
            "ul" | "ol" => {
                inner.list_depth = Some(ctx.next_list_depth());
                inner.list_ordered = tag == "ol";
                inner.list_start = parse_start(node.attr("start"));
                self.build_list_items(node.children(), &inner)
            }
            "thead" => {
                inner.in_table_head = true;
                self.build_children(node.children(), &inner)
            }
            "tr" => self.build_row_cells(node.children(), &inner),
            _ => self.build_children(node.children(), &inner),
        };

        if let Some(handler) = handler {
            if let Some(out) = handler.after(node, &children, &self.span_style(&inner)) {
                return vec![out];
            }
        }

        self.apply_builtin(tag, node, children, &inner)
    }

    fn build_list_items(&mut self, items: &[Node], ctx: &BuildContext<'a>) -> Vec<RenderNode> {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_ctx = BuildContext {
                list_item_index: index,
                ..ctx.clone()
            };
            out.extend(self.build_node(item, &item_ctx, index + 1 == items.len()));
        }
        out
    }

    fn build_row_cells(&mut self, cells: &[Node], ctx: &BuildContext<'a>) -> Vec<RenderNode> {
        let mut out = Vec::with_capacity(cells.len());
        for (column, cell) in cells.iter().enumerate() {
            let cell_ctx = BuildContext {
                table_column: column,
                ..ctx.clone()
            };
            out.extend(self.build_node(cell, &cell_ctx, column + 1 == cells.len()));
        }
        out
    }

    fn apply_builtin(
        &mut self,
        tag: &str,
        node: &Node,
        children: Vec<RenderNode>,
        ctx: &BuildContext<'a>,
    ) -> Vec<RenderNode> {
        let out = match tag {
            "p" => self.block(BlockKind::Paragraph, Some(Role::Paragraph), children),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                self.block(BlockKind::Heading(level), Role::heading(level), children)
            }
            "blockquote" => self.block(BlockKind::BlockQuote, Some(Role::BlockQuote), children),
            "footnote" => self.block(BlockKind::Group, None, children),
            "a" => match node.attr("href").filter(|href| !href.is_empty()) {
                Some(href) => self.link(href, node.attr("title"), children),
                None => return children,
            },
            "img" => match self.image(node, ctx) {
                Some(image) => image,
                None => return Vec::new(),
            },
            "input" if node.attr("type") == Some("checkbox") => self.checkbox(node, ctx),
            "ul" | "ol" => RenderNode::List(ListNode {
                ordered: ctx.list_ordered,
                depth: ctx.list_depth.unwrap_or(0),
                indent: self.style.list_indent.unwrap_or(DEFAULT_LIST_INDENT),
                items: children,
            }),
            "li" => self.list_item(node, children, ctx),
            "table" => {
                let columns = children
                    .iter()
                    .map(|row| match row {
                        RenderNode::TableRow { cells, .. } => cells.len(),
                        _ => 0,
                    })
                    .max()
                    .unwrap_or(0);
                RenderNode::Table(TableNode {
                    columns,
                    rows: children,
                })
            }
            "tr" => RenderNode::TableRow {
                header: ctx.in_table_head,
                cells: children,
            },
            "th" | "td" => {
                let header = tag == "th" || ctx.in_table_head;
                let role = if header { Role::TableHead } else { Role::TableCell };
                RenderNode::TableCell {
                    column: ctx.table_column,
                    header,
                    align: node.attr("align").and_then(TextAlign::from_attr),
                    style: self.style.role(role).block.clone(),
                    children,
                }
            }
            "pre" => self.code_block(node, ctx),
            "hr" => RenderNode::Rule {
                style: self.style.role(Role::HorizontalRule).block.clone(),
            },
            "br" => RenderNode::LineBreak,
            _ => {
                if !INLINE_TAGS.contains(&tag) {
                    tracing::debug!(tag, "no rule for tag, rendering children inline");
                }
                return children;
            }
        };
        vec![out]
    }

    fn block(&self, kind: BlockKind, role: Option<Role>, children: Vec<RenderNode>) -> RenderNode {
        let style = role.map(|role| self.style.role(role).block.clone()).unwrap_or_default();
        RenderNode::Block(BlockNode {
            kind,
            style,
            selectable: self.options.selectable,
            children,
        })
    }

    fn link(&mut self, href: &str, title: Option<&str>, children: Vec<RenderNode>) -> RenderNode {
        let handle = self.interactions.create_link_handle(href, self.on_tap_link.clone());
        RenderNode::Link(LinkNode {
            href: href.to_string(),
            title: title.map(str::to_string),
            handle,
            children,
        })
    }

    fn image(&self, node: &Node, ctx: &BuildContext<'a>) -> Option<RenderNode> {
        let alt = node.attr("alt").filter(|alt| !alt.is_empty());
        let src = node.attr("src").unwrap_or_default();
        if src.trim().is_empty() {
            tracing::debug!("image without source, rendering alt text");
            return alt.map(|alt| RenderNode::text(alt, self.span_style(ctx)));
        }

        let resolved = resolve_image(
            src,
            self.options.base_url.as_ref(),
            self.options.image_directory.as_deref(),
        );
        let request = ImageRequest {
            uri: resolved.uri,
            source: resolved.source,
            title: node.attr("title").map(str::to_string),
            alt: alt.map(str::to_string),
            width: parse_dimension(node.attr("width")).or(resolved.width),
            height: parse_dimension(node.attr("height")).or(resolved.height),
        };

        if let Some(handler) = self.registry.image_handler() {
            return Some(handler(&request));
        }

        Some(RenderNode::Image(ImageNode {
            source: request.source,
            uri: request.uri,
            title: request.title,
            alt: request.alt,
            width: request.width,
            height: request.height,
        }))
    }

    fn checkbox(&self, node: &Node, ctx: &BuildContext<'a>) -> RenderNode {
        let checked = parse_checked(node.attr("checked"));
        match self.registry.checkbox_handler() {
            Some(handler) => handler(checked),
            None => RenderNode::Checkbox(CheckboxNode::new(checked, self.span_style(ctx))),
        }
    }

    fn list_item(&self, node: &Node, children: Vec<RenderNode>, ctx: &BuildContext<'a>) -> RenderNode {
        let marker = if is_task_item(node) {
            None
        } else {
            let bullet = BulletContext {
                index: ctx.list_item_index,
                number: ctx.list_start.saturating_add(ctx.list_item_index as u64),
                ordered: ctx.list_ordered,
                depth: ctx.list_depth.unwrap_or(0),
            };
            Some(Box::new(self.bullet(&bullet, ctx)))
        };

        RenderNode::ListItem(ListItemNode {
            index: ctx.list_item_index,
            marker,
            children,
        })
    }

    fn bullet(&self, bullet: &BulletContext, ctx: &BuildContext<'a>) -> RenderNode {
        if let Some(handler) = self.registry.bullet_handler() {
            return handler(bullet);
        }

        let glyph = if bullet.ordered {
            format!("{}.", bullet.number)
        } else {
            match bullet.depth {
                0 => "•".to_string(),
                1 => "◦".to_string(),
                _ => "▪".to_string(),
            }
        };
        let style = ctx
            .text_style
            .merge(&self.style.role(Role::ListBullet).text)
            .scaled(self.style.text_scale());
        RenderNode::text(glyph, style)
    }

    fn code_block(&self, node: &Node, ctx: &BuildContext<'a>) -> RenderNode {
        let mut code = normalize_newlines(&text_content(node)).into_owned();
        if code.ends_with('\n') {
            code.pop();
        }

        let language = node
            .children()
            .iter()
            .chain(std::iter::once(node))
            .filter_map(|n| n.attr("class"))
            .flat_map(str::split_whitespace)
            .find_map(|class| class.strip_prefix("language-"))
            .map(str::to_string);

        let base = self.span_style(ctx);
        let spans = match self.highlighter {
            Some(highlighter) => highlighter.highlight(&code, language.as_deref(), &base),
            None => vec![TextSpan::new(code, base)],
        };

        RenderNode::CodeBlock {
            language,
            spans,
            style: self.style.role(Role::CodeBlock).block.clone(),
            selectable: self.options.selectable,
        }
    }

    fn span_style(&self, ctx: &BuildContext<'a>) -> TextStyle {
        ctx.text_style.clone().scaled(self.style.text_scale())
    }
}

/// Collapses a top-level node list into a single root.
///
/// A single node is returned as is; anything else is wrapped in a column
/// that stretches its children unless `fit_content` is set.
pub fn compose_root(mut nodes: Vec<RenderNode>, fit_content: bool, spacing: f32) -> RenderNode {
    if nodes.len() == 1 {
        if let Some(node) = nodes.pop() {
            return node;
        }
    }
    RenderNode::Column {
        stretch: !fit_content,
        spacing,
        children: nodes,
    }
}

fn role_for(tag: &str, ctx: &BuildContext<'_>) -> Option<Role> {
    match tag {
        "td" if ctx.in_table_head => Some(Role::TableHead),
        _ => Role::for_tag(tag),
    }
}

/// Joins neighbouring text runs that share a style.
fn merge_adjacent_text(nodes: Vec<RenderNode>) -> Vec<RenderNode> {
    let mut out: Vec<RenderNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (Some(RenderNode::Text(prev)), RenderNode::Text(next)) = (out.last_mut(), &node) {
            if prev.style == next.style {
                prev.text.push_str(&next.text);
                continue;
            }
        }
        out.push(node);
    }
    out
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn parse_checked(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "checked" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            tracing::warn!(value, "unparseable checkbox state, treating as unchecked");
            false
        }
    }
}

fn parse_start(value: Option<&str>) -> u64 {
    match value {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::debug!(value, "invalid list start, using 1");
            1
        }),
        None => 1,
    }
}

fn parse_dimension(value: Option<&str>) -> Option<f32> {
    value?
        .trim()
        .trim_end_matches("px")
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn is_task_item(node: &Node) -> bool {
    let class = node
        .attr("class")
        .is_some_and(|class| class.split_whitespace().any(|c| c == "task-list-item"));
    class
        || node
            .children()
            .first()
            .is_some_and(|first| first.is_element("input") && first.attr("type") == Some("checkbox"))
}
