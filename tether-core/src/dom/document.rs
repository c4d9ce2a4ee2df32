//! The document: node factory and connectivity root.

use std::sync::Arc;

use super::element::Element;
use super::node::{Node, TextNode};
use super::parser;

struct DocumentInner {
    body: Element,
}

/// An in-memory document. Nodes attached under [`Document::body`] report
/// `is_connected() == true`; everything else is detached.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                body: Element::create_root("body"),
            }),
        }
    }

    pub fn body(&self) -> Element {
        self.inner.body.clone()
    }

    pub fn create_element(&self, tag: &str) -> Element {
        Element::create(tag)
    }

    pub fn create_text_node(&self, text: &str) -> TextNode {
        TextNode::new(text)
    }

    /// Parse markup into a list of top-level nodes. The parser is lenient:
    /// unclosed tags auto-close at the end of input.
    pub fn parse_fragment(&self, html: &str) -> Vec<Node> {
        parser::parse_fragment(html)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
