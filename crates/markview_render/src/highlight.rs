//! Syntax highlighting hook for code blocks.

use crate::render_node::TextSpan;
use crate::style::TextStyle;

/// Turns the body of a code block into styled runs.
///
/// `base` is the resolved code block text style; implementations usually
/// merge their token colors onto it.
pub trait SyntaxHighlighter: Send + Sync {
    fn highlight(&self, code: &str, language: Option<&str>, base: &TextStyle) -> Vec<TextSpan>;
}

impl<F> SyntaxHighlighter for F
where
    F: Fn(&str, Option<&str>, &TextStyle) -> Vec<TextSpan> + Send + Sync,
{
    fn highlight(&self, code: &str, language: Option<&str>, base: &TextStyle) -> Vec<TextSpan> {
        self(code, language, base)
    }
}
