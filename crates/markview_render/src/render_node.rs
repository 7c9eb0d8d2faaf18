//! The renderable output tree.
//!
//! A host walks a [`RenderNode`] tree and maps each variant onto its own
//! widgets. The tree carries fully resolved styles, so no further lookup
//! against a [`StyleConfig`](crate::StyleConfig) is needed.

use std::fmt::Write as _;

use markview_ast::Attributes;
use serde::Serialize;

use crate::image::ImageSource;
use crate::interaction::TapHandle;
use crate::style::{BoxStyle, EdgeInsets, TextAlign, TextStyle};

/// A node of the renderable tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    Block(BlockNode),
    Text(TextSpan),
    Link(LinkNode),
    Image(ImageNode),
    List(ListNode),
    ListItem(ListItemNode),
    Table(TableNode),
    TableRow {
        header: bool,
        cells: Vec<RenderNode>,
    },
    TableCell {
        column: usize,
        header: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        align: Option<TextAlign>,
        style: BoxStyle,
        children: Vec<RenderNode>,
    },
    Checkbox(CheckboxNode),
    CodeBlock {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        spans: Vec<TextSpan>,
        style: BoxStyle,
        selectable: bool,
    },
    Rule {
        style: BoxStyle,
    },
    LineBreak,
    /// Vertical stack of blocks.
    Column {
        stretch: bool,
        spacing: f32,
        children: Vec<RenderNode>,
    },
    /// Scrollable, padded container.
    Scroll {
        padding: EdgeInsets,
        child: Box<RenderNode>,
    },
    /// Output of an element handler that has no built-in counterpart.
    Custom {
        name: String,
        #[serde(skip_serializing_if = "Attributes::is_empty")]
        attributes: Attributes,
        children: Vec<RenderNode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    BlockQuote,
    /// Anonymous grouping, e.g. a list item body with several blocks.
    Group,
}

/// A block of inline content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockNode {
    pub kind: BlockKind,
    pub style: BoxStyle,
    pub selectable: bool,
    pub children: Vec<RenderNode>,
}

/// A run of text with one resolved style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpan {
    pub text: String,
    pub style: TextStyle,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkNode {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub handle: TapHandle,
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageNode {
    pub source: ImageSource,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListNode {
    pub ordered: bool,
    /// Nesting depth, starting at 0.
    pub depth: usize,
    pub indent: f32,
    pub items: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItemNode {
    /// Position within the parent list, starting at 0.
    pub index: usize,
    /// Bullet or number. Absent for task items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Box<RenderNode>>,
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableNode {
    pub columns: usize,
    pub rows: Vec<RenderNode>,
}

/// A read-only task checkbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckboxNode {
    pub checked: bool,
    pub enabled: bool,
    pub glyph: char,
    pub style: TextStyle,
}

impl CheckboxNode {
    pub const CHECKED: char = '☑';
    pub const UNCHECKED: char = '☐';

    /// Default read-only checkbox.
    pub fn new(checked: bool, style: TextStyle) -> Self {
        Self {
            checked,
            enabled: false,
            glyph: if checked { Self::CHECKED } else { Self::UNCHECKED },
            style,
        }
    }
}

impl RenderNode {
    /// Creates a text node.
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Self::Text(TextSpan::new(text, style))
    }

    /// Direct children, in order.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Block(block) => &block.children,
            Self::Link(link) => &link.children,
            Self::List(list) => &list.items,
            Self::ListItem(item) => &item.children,
            Self::Table(table) => &table.rows,
            Self::TableRow { cells, .. } => cells,
            Self::TableCell { children, .. } | Self::Column { children, .. } | Self::Custom { children, .. } => {
                children
            }
            Self::Scroll { child, .. } => std::slice::from_ref(child.as_ref()),
            Self::Text(_)
            | Self::Image(_)
            | Self::Checkbox(_)
            | Self::CodeBlock { .. }
            | Self::Rule { .. }
            | Self::LineBreak => &[],
        }
    }

    /// Calls `f` for this node and every descendant, depth first.
    ///
    /// List markers are visited before their item's children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a RenderNode)) {
        f(self);
        if let Self::ListItem(ListItemNode {
            marker: Some(marker), ..
        }) = self
        {
            marker.walk(f);
        }
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Every link handle in the tree, in document order.
    pub fn link_handles(&self) -> Vec<&TapHandle> {
        let mut handles = Vec::new();
        self.walk(&mut |node| {
            if let Self::Link(link) = node {
                handles.push(&link.handle);
            }
        });
        handles
    }

    /// Concatenated visible text, ignoring list markers.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(span) => out.push_str(&span.text),
            Self::CodeBlock { spans, .. } => spans.iter().for_each(|span| out.push_str(&span.text)),
            Self::Checkbox(checkbox) => out.push(checkbox.glyph),
            Self::LineBreak => out.push('\n'),
            _ => self.children().iter().for_each(|child| child.collect_text(out)),
        }
    }

    /// Indented, human-readable description of the tree.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = match self {
            Self::Block(block) => match block.kind {
                BlockKind::Heading(level) => writeln!(out, "{indent}heading {level}"),
                BlockKind::Paragraph => writeln!(out, "{indent}paragraph"),
                BlockKind::BlockQuote => writeln!(out, "{indent}blockquote"),
                BlockKind::Group => writeln!(out, "{indent}group"),
            },
            Self::Text(span) => writeln!(out, "{indent}text {:?}", span.text),
            Self::Link(link) => writeln!(out, "{indent}link {}", link.href),
            Self::Image(image) => writeln!(out, "{indent}image {:?} {}", image.source, image.uri),
            Self::List(list) => writeln!(
                out,
                "{indent}{} list depth={}",
                if list.ordered { "ordered" } else { "bullet" },
                list.depth
            ),
            Self::ListItem(item) => writeln!(out, "{indent}item {}", item.index),
            Self::Table(table) => writeln!(out, "{indent}table columns={}", table.columns),
            Self::TableRow { header, .. } => {
                writeln!(out, "{indent}{}", if *header { "header row" } else { "row" })
            }
            Self::TableCell { column, align, .. } => match align {
                Some(align) => writeln!(out, "{indent}cell {column} {align:?}"),
                None => writeln!(out, "{indent}cell {column}"),
            },
            Self::Checkbox(checkbox) => writeln!(out, "{indent}checkbox {}", checkbox.glyph),
            Self::CodeBlock { language, spans, .. } => {
                let code: String = spans.iter().map(|span| span.text.as_str()).collect();
                match language {
                    Some(language) => writeln!(out, "{indent}code {language} {code:?}"),
                    None => writeln!(out, "{indent}code {code:?}"),
                }
            }
            Self::Rule { .. } => writeln!(out, "{indent}rule"),
            Self::LineBreak => writeln!(out, "{indent}break"),
            Self::Column { stretch, .. } => {
                writeln!(out, "{indent}column{}", if *stretch { " stretch" } else { "" })
            }
            Self::Scroll { .. } => writeln!(out, "{indent}scroll"),
            Self::Custom { name, .. } => writeln!(out, "{indent}custom {name}"),
        };

        if let Self::ListItem(ListItemNode {
            marker: Some(marker), ..
        }) = self
        {
            let _ = writeln!(out, "{indent}  marker");
            marker.write_outline(out, depth + 2);
        }
        for child in self.children() {
            child.write_outline(out, depth + 1);
        }
    }
}
