//! Parser trait definition.

use markview_ast::Node;

use crate::ParseError;

/// Trait for parsing source text into a document tree.
///
/// The renderer only consumes the resulting nodes, so any markup language
/// that can be expressed with the HTML tag vocabulary can be rendered.
pub trait Parser {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["md", "markdown"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into top-level nodes in document order.
    fn parse(&self, source: &str) -> Result<Vec<Node>, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
