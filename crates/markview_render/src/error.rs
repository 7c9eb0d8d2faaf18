//! Render error types.

use thiserror::Error;

/// Errors surfaced by the renderer.
///
/// Problems confined to a single node (unknown tags, malformed attributes)
/// never surface here; they degrade locally during the tree walk.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No document was supplied to the view.
    #[error("No document supplied to render")]
    MissingAst,

    /// The view was torn down and can no longer render.
    #[error("View has been disposed")]
    Disposed,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] markview_parser::ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
