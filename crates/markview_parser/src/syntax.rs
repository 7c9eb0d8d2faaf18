//! Custom syntaxes layered on top of the Markdown grammar.
//!
//! Inline syntaxes rewrite matches inside text leaves; block syntaxes replace
//! whole top-level paragraphs whose raw source matches. Both are registered by
//! the host and handed to the parser through [`ParseOptions`](crate::ParseOptions).

use std::sync::Arc;

use markview_ast::Node;
use regex::{Captures, Regex};

/// A custom inline rule.
///
/// # Example
///
/// ```rust
/// use markview_ast::Node;
/// use markview_parser::InlineSyntax;
/// use regex::{Captures, Regex};
///
/// struct Mention(Regex);
///
/// impl InlineSyntax for Mention {
///     fn name(&self) -> &str {
///         "mention"
///     }
///
///     fn pattern(&self) -> &Regex {
///         &self.0
///     }
///
///     fn on_match(&self, captures: &Captures<'_>) -> Option<Node> {
///         let user = captures.get(1)?.as_str();
///         Some(Node::element("mention", vec![Node::text(user)]).with_attr("user", user))
///     }
/// }
/// ```
pub trait InlineSyntax: Send + Sync {
    /// Returns the name of this syntax (used in logs).
    fn name(&self) -> &str;

    /// Pattern searched for inside text leaves.
    fn pattern(&self) -> &Regex;

    /// Builds the replacement node. Returning `None` keeps the matched text.
    fn on_match(&self, captures: &Captures<'_>) -> Option<Node>;
}

/// A custom block rule applied to top-level paragraphs.
pub trait BlockSyntax: Send + Sync {
    /// Returns the name of this syntax (used in logs).
    fn name(&self) -> &str;

    /// Pattern tested against the raw source of a paragraph.
    fn pattern(&self) -> &Regex;

    /// Builds the replacement node. Returning `None` keeps the paragraph.
    fn parse(&self, block: &str) -> Option<Node>;
}

/// Rewrites text leaves with the given inline syntaxes.
///
/// Code spans and code blocks are left untouched. Syntaxes are tried in
/// registration order; replacement nodes are not re-scanned.
pub(crate) fn apply_inline_syntaxes(syntaxes: &[Arc<dyn InlineSyntax>], nodes: Vec<Node>) -> Vec<Node> {
    if syntaxes.is_empty() {
        return nodes;
    }

    nodes
        .into_iter()
        .flat_map(|node| match node {
            Node::Text { content } => expand_text(&content, syntaxes),
            Node::Element {
                tag,
                attributes,
                children,
            } => {
                let children = if tag == "code" || tag == "pre" {
                    children
                } else {
                    apply_inline_syntaxes(syntaxes, children)
                };
                vec![Node::Element {
                    tag,
                    attributes,
                    children,
                }]
            }
        })
        .collect()
}

fn expand_text(text: &str, syntaxes: &[Arc<dyn InlineSyntax>]) -> Vec<Node> {
    let Some((syntax, rest)) = syntaxes.split_first() else {
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::text(text)]
        };
    };

    let mut out = Vec::new();
    let mut last = 0;

    for captures in syntax.pattern().captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.as_str().is_empty() || whole.start() < last {
            continue;
        }
        let Some(replacement) = syntax.on_match(&captures) else {
            continue;
        };

        tracing::trace!(syntax = syntax.name(), matched = whole.as_str(), "inline syntax matched");
        out.extend(expand_text(&text[last..whole.start()], rest));
        out.push(replacement);
        last = whole.end();
    }

    out.extend(expand_text(&text[last..], rest));
    out
}

/// Returns the replacement for a paragraph, if any block syntax claims it.
pub(crate) fn match_block_syntax(syntaxes: &[Arc<dyn BlockSyntax>], block: &str) -> Option<Node> {
    syntaxes.iter().find_map(|syntax| {
        if !syntax.pattern().is_match(block) {
            return None;
        }
        let node = syntax.parse(block)?;
        tracing::trace!(syntax = syntax.name(), "block syntax matched");
        Some(node)
    })
}
