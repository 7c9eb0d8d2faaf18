//! Node definition.
//!
//! The document tree handed to the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::visitor::{Visitor, walk_node};

/// Element attributes, ordered by name for stable output.
pub type Attributes = BTreeMap<String, String>;

/// A node in the document tree.
///
/// The tree is strict: no node is shared between parents and there are no
/// cycles. Once produced by a parser it is treated as immutable.
///
/// # Example
///
/// ```rust
/// use markview_ast::Node;
///
/// let paragraph = Node::element("p", vec![
///     Node::text("Hello "),
///     Node::element("strong", vec![Node::text("world")]),
/// ]);
///
/// assert_eq!(paragraph.children().len(), 2);
/// assert!(paragraph.children()[0].is_text());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A run of literal text.
    Text {
        /// Literal text content.
        content: String,
    },

    /// A tagged element.
    Element {
        /// Tag name (lowercase, HTML vocabulary).
        tag: String,

        /// Attributes by name.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: Attributes,

        /// Child nodes in document order.
        #[serde(default)]
        children: Vec<Node>,
    },
}

impl Node {
    /// Creates a text leaf.
    #[inline]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Creates an element without attributes.
    #[inline]
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Element {
            tag: tag.into(),
            attributes: Attributes::new(),
            children,
        }
    }

    /// Creates an element with no children and no attributes.
    #[inline]
    pub fn empty(tag: impl Into<String>) -> Self {
        Self::element(tag, Vec::new())
    }

    /// Returns this node with the attribute set.
    ///
    /// Has no effect on text leaves.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attributes, .. } = &mut self {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Returns the tag name for elements.
    #[inline]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text { .. } => None,
        }
    }

    /// Returns the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            Self::Text { .. } => None,
        }
    }

    /// Returns the attribute map (empty for text leaves).
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            Self::Text { .. } => None,
        }
    }

    /// Returns the children (empty for text leaves).
    #[inline]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text { .. } => &[],
        }
    }

    /// Returns true if this node is a text leaf.
    #[inline]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Returns the literal content of a text leaf.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::Element { .. } => None,
        }
    }

    /// Returns true if this is an element with the given tag.
    #[inline]
    pub fn is_element(&self, name: &str) -> bool {
        self.tag() == Some(name)
    }
}

/// Concatenates all descendant text of `node` in document order.
pub fn text_content(node: &Node) -> String {
    struct Collector(String);

    impl Visitor for Collector {
        fn visit_text(&mut self, content: &str) -> crate::VisitResult {
            self.0.push_str(content);
            std::ops::ControlFlow::Continue(())
        }
    }

    let mut collector = Collector(String::new());
    let _ = walk_node(&mut collector, node);
    collector.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_node() {
        let node = Node::text("hello");

        assert!(node.is_text());
        assert_eq!(node.as_text(), Some("hello"));
        assert_eq!(node.tag(), None);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_element_node() {
        let node = Node::element("p", vec![Node::text("a"), Node::text("b")]);

        assert!(!node.is_text());
        assert_eq!(node.tag(), Some("p"));
        assert!(node.is_element("p"));
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn test_with_attr() {
        let node = Node::empty("img")
            .with_attr("src", "a.png")
            .with_attr("alt", "A");

        assert_eq!(node.attr("src"), Some("a.png"));
        assert_eq!(node.attr("alt"), Some("A"));
        assert_eq!(node.attr("title"), None);
    }

    #[test]
    fn test_with_attr_on_text_is_noop() {
        let node = Node::text("x").with_attr("class", "y");
        assert_eq!(node, Node::text("x"));
        assert_eq!(node.attr("class"), None);
    }

    #[test]
    fn test_text_content_nested() {
        let node = Node::element(
            "p",
            vec![
                Node::text("one "),
                Node::element("em", vec![Node::text("two")]),
                Node::text(" three"),
            ],
        );

        assert_eq!(text_content(&node), "one two three");
    }

    #[test]
    fn test_serialization_text() {
        let json = serde_json::to_value(Node::text("hi")).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_serialization_element_skips_empty_attributes() {
        let json = serde_json::to_value(Node::element("p", vec![])).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["type"], "element");
        assert_eq!(obj["tag"], "p");
        assert!(!obj.contains_key("attributes"));
        assert!(obj["children"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_deserialization() {
        let json = r#"{
            "type": "element",
            "tag": "a",
            "attributes": { "href": "https://example.test" },
            "children": [{ "type": "text", "content": "click" }]
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(
            node,
            Node::element("a", vec![Node::text("click")]).with_attr("href", "https://example.test")
        );
    }
}
