//! Node handles: the [`Node`] union and text nodes.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::element::{Element, ElementInner};

/// A text node. Clones share the node; equality is identity.
pub struct TextNode {
    inner: Arc<TextInner>,
}

struct TextInner {
    data: RwLock<String>,
    parent: RwLock<Weak<ElementInner>>,
}

impl TextNode {
    pub(crate) fn new(data: &str) -> Self {
        Self {
            inner: Arc::new(TextInner {
                data: RwLock::new(data.to_string()),
                parent: RwLock::new(Weak::new()),
            }),
        }
    }

    /// The character data.
    pub fn data(&self) -> String {
        self.inner.data.read().clone()
    }

    pub fn set_data(&self, data: &str) {
        *self.inner.data.write() = data.to_string();
    }

    pub fn parent(&self) -> Option<Element> {
        self.inner.parent.read().upgrade().map(Element::from_inner)
    }

    /// Whether the node is attached to the document.
    pub fn is_connected(&self) -> bool {
        match self.parent() {
            Some(parent) => parent.is_connected(),
            None => false,
        }
    }

    /// Detach from the parent, if any.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(&Node::Text(self.clone()));
        }
    }

    pub(crate) fn set_parent_weak(&self, parent: Weak<ElementInner>) {
        *self.inner.parent.write() = parent;
    }
}

impl Clone for TextNode {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PartialEq for TextNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextNode").field("data", &self.data()).finish()
    }
}

/// Either an element or a text node.
#[derive(Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(TextNode),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn parent(&self) -> Option<Element> {
        match self {
            Node::Element(element) => element.parent(),
            Node::Text(text) => text.parent(),
        }
    }

    pub fn is_connected(&self) -> bool {
        match self {
            Node::Element(element) => element.is_connected(),
            Node::Text(text) => text.is_connected(),
        }
    }

    /// The concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Element(element) => element.text_content(),
            Node::Text(text) => text.data(),
        }
    }

    /// Replace the node's textual content: character data for text nodes,
    /// the whole child list for elements.
    pub fn set_text_content(&self, text: &str) {
        match self {
            Node::Element(element) => element.set_text_content(text),
            Node::Text(node) => node.set_data(text),
        }
    }

    /// Detach from the parent, if any.
    pub fn remove(&self) {
        match self {
            Node::Element(element) => element.remove(),
            Node::Text(text) => text.remove(),
        }
    }

    pub(crate) fn set_parent_weak(&self, parent: Weak<ElementInner>) {
        match self {
            Node::Element(element) => element.set_parent_weak(parent),
            Node::Text(text) => text.set_parent_weak(parent),
        }
    }

    pub(crate) fn clear_parent(&self) {
        self.set_parent_weak(Weak::new());
    }

    pub(crate) fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<TextNode> for Node {
    fn from(text: TextNode) -> Self {
        Node::Text(text)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => fmt::Debug::fmt(element, f),
            Node::Text(text) => fmt::Debug::fmt(text, f),
        }
    }
}
