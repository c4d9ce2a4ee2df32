//! HTML fragment parsing and serialization.
//!
//! A small, lenient parser covering the markup the template compiler and
//! `inner_html` writes produce: elements with quoted/unquoted/bare
//! attributes, text with basic entities, comments, self-closing syntax, and
//! the void-element set. Unclosed tags auto-close at end of input; stray
//! closing tags pop to the nearest matching open tag and are otherwise
//! ignored.

use super::element::Element;
use super::node::{Node, TextNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

fn append(node: Node, stack: &[Element], top_level: &mut Vec<Node>) {
    match stack.last() {
        Some(parent) => parent.append_child(node),
        None => top_level.push(node),
    }
}

/// Parse markup into top-level nodes.
pub(crate) fn parse_fragment(html: &str) -> Vec<Node> {
    let mut top_level: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];

        let Some(lt) = rest.find('<') else {
            append(
                Node::Text(TextNode::new(&decode_entities(rest))),
                &stack,
                &mut top_level,
            );
            break;
        };

        if lt > 0 {
            append(
                Node::Text(TextNode::new(&decode_entities(&rest[..lt]))),
                &stack,
                &mut top_level,
            );
            pos += lt;
            continue;
        }

        if rest.starts_with("<!--") {
            pos += match rest.find("-->") {
                Some(end) => end + 3,
                None => rest.len(),
            };
            continue;
        }

        if rest.starts_with("</") {
            let Some(gt) = rest.find('>') else {
                break;
            };
            let name = rest[2..gt].trim().to_ascii_lowercase();
            if let Some(position) = stack.iter().rposition(|element| element.tag() == name) {
                stack.truncate(position);
            }
            pos += gt + 1;
            continue;
        }

        match parse_open_tag(rest) {
            Some((element, consumed, self_closing)) => {
                let tag = element.tag();
                append(Node::Element(element.clone()), &stack, &mut top_level);
                if !self_closing && !is_void(&tag) {
                    stack.push(element);
                }
                pos += consumed;
            }
            None => {
                // A lone '<' that opens nothing: take it as text.
                append(Node::Text(TextNode::new("<")), &stack, &mut top_level);
                pos += 1;
            }
        }
    }

    top_level
}

/// Parse one open tag starting at `<`. Returns the element, the bytes
/// consumed, and whether the tag was self-closing.
fn parse_open_tag(rest: &str) -> Option<(Element, usize, bool)> {
    let bytes = rest.as_bytes();
    let mut i = 1;

    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let element = Element::create(&rest[name_start..i].to_ascii_lowercase());

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            // unterminated tag: accept what we have
            return Some((element, bytes.len(), true));
        }
        if bytes[i] == b'>' {
            return Some((element, i + 1, false));
        }
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>') {
            return Some((element, i + 2, true));
        }

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == attr_start {
            i += 1;
            continue;
        }
        let attr_name = rest[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut attr_value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                attr_value = decode_entities(&rest[value_start..i]);
                if i < bytes.len() {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                attr_value = decode_entities(&rest[value_start..i]);
            }
        }

        element.set_attribute(&attr_name, &attr_value);
    }
}

/// Serialize an element's child list to markup.
pub(crate) fn serialize_children(element: &Element) -> String {
    let mut out = String::new();
    for child in element.children() {
        serialize_node(&child, &mut out);
    }
    out
}

fn serialize_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_text(&text.data())),
        Node::Element(element) => {
            let tag = element.tag();
            out.push('<');
            out.push_str(&tag);
            for (name, value) in element.attributes() {
                out.push(' ');
                out.push_str(&name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(&value));
                out.push('"');
            }
            out.push('>');
            if !is_void(&tag) {
                for child in element.children() {
                    serialize_node(&child, out);
                }
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
        }
    }
}
