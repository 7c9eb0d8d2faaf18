//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! The mdast produced by `markdown-rs` is lowered to the markview document
//! tree using HTML tag names, the vocabulary the renderer dispatches on.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ::markdown::mdast::{self, AlignKind};
use ::markdown::to_mdast;
use markview_ast::Node;

use crate::syntax::{apply_inline_syntaxes, match_block_syntax};
use crate::{BlockSyntax, InlineSyntax, ParseError, Parser};

/// Options controlling how Markdown is lowered to the document tree.
#[derive(Clone)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown (tables, task lists, strikethrough, footnotes).
    pub gfm: bool,

    /// Escape `&`, `<`, `>` and `"` in text leaves as HTML entities.
    pub encode_html: bool,

    /// Custom inline syntaxes, applied in order.
    pub inline_syntaxes: Vec<Arc<dyn InlineSyntax>>,

    /// Custom block syntaxes, tried in order against top-level paragraphs.
    pub block_syntaxes: Vec<Arc<dyn BlockSyntax>>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            encode_html: false,
            inline_syntaxes: Vec::new(),
            block_syntaxes: Vec::new(),
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("gfm", &self.gfm)
            .field("encode_html", &self.encode_html)
            .field(
                "inline_syntaxes",
                &self.inline_syntaxes.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field(
                "block_syntaxes",
                &self.block_syntaxes.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Markdown parser implementation.
///
/// Supports CommonMark plus GFM tables, task lists, strikethrough and
/// footnotes. Task list markers become disabled `input` checkboxes.
#[derive(Debug, Default)]
pub struct MarkdownParser {
    options: ParseOptions,
}

impl MarkdownParser {
    /// Creates a new Markdown parser with default options (GFM).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Returns the options this parser was configured with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn markdown_options(&self) -> ::markdown::ParseOptions {
        if self.options.gfm {
            ::markdown::ParseOptions::gfm()
        } else {
            ::markdown::ParseOptions::default()
        }
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkdn", "mkd"]
    }

    fn parse(&self, source: &str) -> Result<Vec<Node>, ParseError> {
        let mdast = to_mdast(source, &self.markdown_options())
            .map_err(|e| ParseError::InvalidMarkdown(e.to_string()))?;

        let mdast::Node::Root(root) = &mdast else {
            return Err(ParseError::MissingRoot);
        };

        let mut converter = Converter::new(source, &self.options);
        converter.collect_definitions(&mdast);

        let mut nodes = Vec::with_capacity(root.children.len());
        for child in &root.children {
            if let Some(replacement) = converter.block_replacement(child) {
                nodes.push(replacement);
                continue;
            }
            let converted = converter.convert(child);
            nodes.extend(apply_inline_syntaxes(&self.options.inline_syntaxes, converted));
        }

        tracing::debug!(top_level = nodes.len(), "parsed markdown");
        Ok(nodes)
    }
}

/// A link or image definition (`[id]: url "title"`).
struct Definition {
    url: String,
    title: Option<String>,
}

/// Lowers one mdast tree.
struct Converter<'s> {
    source: &'s str,
    options: &'s ParseOptions,
    definitions: HashMap<String, Definition>,
}

impl<'s> Converter<'s> {
    fn new(source: &'s str, options: &'s ParseOptions) -> Self {
        Self {
            source,
            options,
            definitions: HashMap::new(),
        }
    }

    fn collect_definitions(&mut self, node: &mdast::Node) {
        if let mdast::Node::Definition(def) = node {
            self.definitions
                .entry(def.identifier.to_lowercase())
                .or_insert_with(|| Definition {
                    url: def.url.clone(),
                    title: def.title.clone(),
                });
        }
        if let Some(children) = node.children() {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    fn block_replacement(&self, node: &mdast::Node) -> Option<Node> {
        if self.options.block_syntaxes.is_empty() {
            return None;
        }
        let mdast::Node::Paragraph(_) = node else {
            return None;
        };
        let position = node.position()?;
        let block = self.source.get(position.start.offset..position.end.offset)?;
        match_block_syntax(&self.options.block_syntaxes, block)
    }

    fn convert_children(&self, children: &[mdast::Node]) -> Vec<Node> {
        children.iter().flat_map(|child| self.convert(child)).collect()
    }

    fn element(&self, tag: &str, children: &[mdast::Node]) -> Vec<Node> {
        vec![Node::element(tag, self.convert_children(children))]
    }

    /// Converts an mdast node; may yield zero nodes (definitions, front matter).
    fn convert(&self, node: &mdast::Node) -> Vec<Node> {
        use mdast::Node as Md;

        match node {
            Md::Root(root) => self.convert_children(&root.children),

            Md::Paragraph(para) => self.element("p", &para.children),

            Md::Heading(heading) => {
                let depth = heading.depth.clamp(1, 6);
                self.element(&format!("h{depth}"), &heading.children)
            }

            Md::Text(text) => vec![Node::text(self.encode(&text.value))],

            Md::Emphasis(em) => self.element("em", &em.children),

            Md::Strong(strong) => self.element("strong", &strong.children),

            Md::Delete(del) => self.element("del", &del.children),

            Md::InlineCode(code) => vec![Node::element("code", vec![Node::text(&code.value)])],

            Md::Code(code) => {
                // Block content keeps a trailing newline, as HTML renderers emit it.
                let mut inner = Node::element("code", vec![Node::text(format!("{}\n", code.value))]);
                if let Some(lang) = &code.lang {
                    inner = inner.with_attr("class", format!("language-{lang}"));
                }
                vec![Node::element("pre", vec![inner])]
            }

            Md::Link(link) => {
                vec![anchor(&link.url, link.title.as_deref(), self.convert_children(&link.children))]
            }

            Md::LinkReference(reference) => {
                let children = self.convert_children(&reference.children);
                match self.definitions.get(&reference.identifier.to_lowercase()) {
                    Some(def) => vec![anchor(&def.url, def.title.as_deref(), children)],
                    None => children,
                }
            }

            Md::Image(image) => vec![img(&image.url, &image.alt, image.title.as_deref())],

            Md::ImageReference(reference) => {
                match self.definitions.get(&reference.identifier.to_lowercase()) {
                    Some(def) => vec![img(&def.url, &reference.alt, def.title.as_deref())],
                    None => vec![Node::text(&reference.alt)],
                }
            }

            Md::List(list) => {
                let tag = if list.ordered { "ol" } else { "ul" };
                let items = list
                    .children
                    .iter()
                    .filter_map(|child| match child {
                        Md::ListItem(item) => Some(self.list_item(item, !list.spread)),
                        _ => None,
                    })
                    .collect();
                let mut node = Node::element(tag, items);
                if list.ordered {
                    node = node.with_attr("start", list.start.unwrap_or(1).to_string());
                }
                vec![node]
            }

            Md::ListItem(item) => vec![self.list_item(item, false)],

            Md::Blockquote(quote) => self.element("blockquote", &quote.children),

            Md::ThematicBreak(_) => vec![Node::empty("hr")],

            Md::Break(_) => vec![Node::empty("br")],

            Md::Html(html) => vec![Node::text(self.encode(&html.value))],

            Md::Table(table) => vec![self.table(table)],

            Md::FootnoteReference(reference) => {
                let label = reference
                    .label
                    .clone()
                    .unwrap_or_else(|| reference.identifier.clone());
                let link = anchor(&format!("#fn-{}", reference.identifier), None, vec![Node::text(label)]);
                vec![Node::element("sup", vec![link])]
            }

            Md::FootnoteDefinition(def) => vec![
                Node::element("footnote", self.convert_children(&def.children))
                    .with_attr("id", format!("fn-{}", def.identifier)),
            ],

            Md::Definition(_) => Vec::new(),

            other => {
                tracing::trace!(node = ?std::mem::discriminant(other), "skipping unsupported mdast node");
                Vec::new()
            }
        }
    }

    fn list_item(&self, item: &mdast::ListItem, tight: bool) -> Node {
        let mut children = Vec::new();
        for child in &item.children {
            match child {
                // Tight lists render their paragraphs inline.
                mdast::Node::Paragraph(para) if tight => {
                    children.extend(self.convert_children(&para.children));
                }
                _ => children.extend(self.convert(child)),
            }
        }

        let checked = item.checked.or_else(|| strip_task_marker(&mut children));
        let mut node = match checked {
            Some(checked) => {
                children.insert(0, checkbox(checked));
                Node::element("li", children).with_attr("class", "task-list-item")
            }
            None => Node::element("li", children),
        };
        if let Node::Element { children, .. } = &mut node {
            drop_empty_text(children);
        }
        node
    }

    fn table(&self, table: &mdast::Table) -> Node {
        let mut head = Vec::new();
        let mut body = Vec::new();

        for (index, row) in table.children.iter().enumerate() {
            let mdast::Node::TableRow(row) = row else {
                continue;
            };
            let cell_tag = if index == 0 { "th" } else { "td" };
            let cells = row
                .children
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    let children = cell.children().map(|c| self.convert_children(c)).unwrap_or_default();
                    let mut node = Node::element(cell_tag, children);
                    if let Some(align) = table.align.get(column).and_then(align_name) {
                        node = node.with_attr("align", align);
                    }
                    node
                })
                .collect();
            let row = Node::element("tr", cells);
            if index == 0 {
                head.push(row);
            } else {
                body.push(row);
            }
        }

        let mut sections = vec![Node::element("thead", head)];
        if !body.is_empty() {
            sections.push(Node::element("tbody", body));
        }
        Node::element("table", sections)
    }

    fn encode(&self, text: &str) -> String {
        if !self.options.encode_html {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                _ => out.push(c),
            }
        }
        out
    }
}

fn anchor(href: &str, title: Option<&str>, children: Vec<Node>) -> Node {
    let mut node = Node::element("a", children).with_attr("href", href);
    if let Some(title) = title {
        node = node.with_attr("title", title);
    }
    node
}

fn img(src: &str, alt: &str, title: Option<&str>) -> Node {
    let mut node = Node::empty("img").with_attr("src", src).with_attr("alt", alt);
    if let Some(title) = title {
        node = node.with_attr("title", title);
    }
    node
}

fn checkbox(checked: bool) -> Node {
    Node::empty("input")
        .with_attr("type", "checkbox")
        .with_attr("disabled", "true")
        .with_attr("checked", checked.to_string())
}

fn align_name(align: &AlignKind) -> Option<&'static str> {
    match align {
        AlignKind::Left => Some("left"),
        AlignKind::Center => Some("center"),
        AlignKind::Right => Some("right"),
        AlignKind::None => None,
    }
}

/// Rewrites a leading `[ ]`, `[x]` or `[X]` marker into a checkbox state.
///
/// Covers task items the grammar did not recognize itself (GFM disabled).
fn strip_task_marker(children: &mut [Node]) -> Option<bool> {
    let first = children.first_mut()?;
    match first {
        Node::Element { tag, children, .. } if tag == "p" => strip_task_marker(children),
        Node::Text { content } => {
            let (checked, rest) = if let Some(rest) = content.strip_prefix("[ ]") {
                (false, rest)
            } else if let Some(rest) = content
                .strip_prefix("[x]")
                .or_else(|| content.strip_prefix("[X]"))
            {
                (true, rest)
            } else {
                return None;
            };
            if !(rest.is_empty() || rest.starts_with(' ')) {
                return None;
            }
            *content = rest.trim_start_matches(' ').to_string();
            Some(checked)
        }
        _ => None,
    }
}

fn drop_empty_text(children: &mut Vec<Node>) {
    children.retain(|child| child.as_text().is_none_or(|text| !text.is_empty()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(source: &str) -> Vec<Node> {
        MarkdownParser::new().parse(source).unwrap()
    }

    #[test]
    fn test_parse_simple_markdown() {
        let nodes = parse("# Hello\n\nThis is a paragraph.");

        assert_eq!(
            nodes,
            vec![
                Node::element("h1", vec![Node::text("Hello")]),
                Node::element("p", vec![Node::text("This is a paragraph.")]),
            ]
        );
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse("").is_empty());
    }

    #[rstest]
    #[case::h1("# x", "h1")]
    #[case::h3("### x", "h3")]
    #[case::h6("###### x", "h6")]
    #[case::quote("> x", "blockquote")]
    #[case::rule("---", "hr")]
    #[case::bullet_list("- x", "ul")]
    #[case::ordered_list("1. x", "ol")]
    #[case::fenced_code("```\nx\n```", "pre")]
    fn test_block_tags(#[case] source: &str, #[case] tag: &str) {
        let nodes = parse(source);
        assert_eq!(nodes[0].tag(), Some(tag));
    }

    #[test]
    fn test_parse_emphasis() {
        let nodes = parse("*italic* and **bold** and ~~gone~~");
        let tags: Vec<_> = nodes[0].children().iter().filter_map(Node::tag).collect();

        assert_eq!(tags, vec!["em", "strong", "del"]);
    }

    #[test]
    fn test_parse_link_with_title() {
        let nodes = parse("[Link](https://example.com \"Example Title\")");
        let link = &nodes[0].children()[0];

        assert_eq!(link.tag(), Some("a"));
        assert_eq!(link.attr("href"), Some("https://example.com"));
        assert_eq!(link.attr("title"), Some("Example Title"));
        assert_eq!(link.children(), &[Node::text("Link")]);
    }

    #[test]
    fn test_parse_reference_link() {
        let nodes = parse("[docs][ref]\n\n[ref]: https://docs.test \"Docs\"");

        assert_eq!(nodes.len(), 1);
        let link = &nodes[0].children()[0];
        assert_eq!(link.attr("href"), Some("https://docs.test"));
        assert_eq!(link.attr("title"), Some("Docs"));
    }

    #[test]
    fn test_parse_image() {
        let nodes = parse("![Alt text](image.png \"Title\")");
        let image = &nodes[0].children()[0];

        assert_eq!(image.tag(), Some("img"));
        assert_eq!(image.attr("src"), Some("image.png"));
        assert_eq!(image.attr("alt"), Some("Alt text"));
        assert_eq!(image.attr("title"), Some("Title"));
    }

    #[test]
    fn test_parse_code_block_keeps_trailing_newline() {
        let nodes = parse("```rust\nfn main() {}\n```");

        assert_eq!(
            nodes,
            vec![Node::element(
                "pre",
                vec![
                    Node::element("code", vec![Node::text("fn main() {}\n")])
                        .with_attr("class", "language-rust")
                ]
            )]
        );
    }

    #[test]
    fn test_parse_inline_code() {
        let nodes = parse("Use `code` here");
        assert_eq!(
            nodes[0].children()[1],
            Node::element("code", vec![Node::text("code")])
        );
    }

    #[test]
    fn test_parse_ordered_list_start() {
        let nodes = parse("3. three\n4. four");

        assert_eq!(nodes[0].tag(), Some("ol"));
        assert_eq!(nodes[0].attr("start"), Some("3"));
        assert_eq!(nodes[0].children().len(), 2);
    }

    #[test]
    fn test_tight_list_unwraps_paragraphs() {
        let nodes = parse("- one\n- two");

        assert_eq!(
            nodes[0],
            Node::element(
                "ul",
                vec![
                    Node::element("li", vec![Node::text("one")]),
                    Node::element("li", vec![Node::text("two")]),
                ]
            )
        );
    }

    #[rstest]
    #[case::checked("- [x] done", true, "done")]
    #[case::unchecked("- [ ] todo", false, "todo")]
    fn test_task_list_items(#[case] source: &str, #[case] checked: bool, #[case] text: &str) {
        let nodes = parse(source);
        let item = &nodes[0].children()[0];

        assert_eq!(item.attr("class"), Some("task-list-item"));
        assert_eq!(item.children()[0], checkbox(checked));
        assert_eq!(markview_ast::text_content(item), text);
    }

    #[rstest]
    #[case::upper("- [X] shout", true)]
    #[case::lower("- [x] quiet", true)]
    #[case::empty("- [ ] open", false)]
    fn test_task_marker_without_gfm(#[case] source: &str, #[case] checked: bool) {
        let parser = MarkdownParser::with_options(ParseOptions {
            gfm: false,
            ..ParseOptions::default()
        });
        let nodes = parser.parse(source).unwrap();
        let item = &nodes[0].children()[0];

        assert_eq!(item.children()[0], checkbox(checked));
    }

    #[test]
    fn test_parse_table() {
        let nodes = parse("| A | B |\n|:--|--:|\n| 1 | 2 |");
        let table = &nodes[0];

        assert_eq!(table.tag(), Some("table"));
        let head = &table.children()[0];
        let body = &table.children()[1];
        assert_eq!(head.tag(), Some("thead"));
        assert_eq!(body.tag(), Some("tbody"));

        let header_cells = head.children()[0].children();
        assert_eq!(header_cells[0].tag(), Some("th"));
        assert_eq!(header_cells[0].attr("align"), Some("left"));
        assert_eq!(header_cells[1].attr("align"), Some("right"));

        let body_cells = body.children()[0].children();
        assert_eq!(body_cells[1], Node::element("td", vec![Node::text("2")]).with_attr("align", "right"));
    }

    #[test]
    fn test_encode_html() {
        let parser = MarkdownParser::with_options(ParseOptions {
            encode_html: true,
            ..ParseOptions::default()
        });
        let nodes = parser.parse("a & b `<c>`").unwrap();

        assert_eq!(nodes[0].children()[0], Node::text("a &amp; b "));
        assert_eq!(
            nodes[0].children()[1],
            Node::element("code", vec![Node::text("<c>")])
        );
    }

    #[test]
    fn test_hard_break() {
        let nodes = parse("one  \ntwo");
        assert!(nodes[0].children().iter().any(|c| c.is_element("br")));
    }

    #[test]
    fn test_extensions() {
        let parser = MarkdownParser::new();

        assert!(parser.can_parse("md"));
        assert!(parser.can_parse("MD"));
        assert!(!parser.can_parse("txt"));
        assert_eq!(parser.name(), "markdown");
    }
}
