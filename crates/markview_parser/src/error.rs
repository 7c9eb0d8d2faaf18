//! Parse error types.

use thiserror::Error;

/// Errors returned by [`Parser::parse`](crate::Parser::parse).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The Markdown grammar rejected the source.
    #[error("Invalid markdown: {0}")]
    InvalidMarkdown(String),

    /// The parser returned a tree without a document root.
    #[error("Markdown parser returned no document root")]
    MissingRoot,
}
