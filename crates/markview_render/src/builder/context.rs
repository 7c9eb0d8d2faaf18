//! Per-node build state threaded down the walk.

use crate::registry::ElementHandler;
use crate::style::TextStyle;

/// Inherited state for the subtree being built.
///
/// A fresh copy is derived for each element, so siblings never observe
/// each other's changes.
#[derive(Clone, Default)]
pub(crate) struct BuildContext<'a> {
    /// Text style accumulated from every ancestor role.
    pub text_style: TextStyle,
    /// Nesting depth of the innermost list, if inside one.
    pub list_depth: Option<usize>,
    pub list_ordered: bool,
    pub list_start: u64,
    /// Index of the list item being built within its list.
    pub list_item_index: usize,
    /// Column of the table cell being built.
    pub table_column: usize,
    pub in_table_head: bool,
    /// Nearest ancestor with a registered handler, used for text leaves.
    pub text_handler: Option<&'a dyn ElementHandler>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(text_style: TextStyle) -> Self {
        Self {
            text_style,
            list_start: 1,
            ..Self::default()
        }
    }

    /// Depth a list opened here would have.
    pub(crate) fn next_list_depth(&self) -> usize {
        self.list_depth.map_or(0, |depth| depth + 1)
    }
}
