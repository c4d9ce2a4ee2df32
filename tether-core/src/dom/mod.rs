//! Host Document
//!
//! An in-memory document tree providing exactly the surface the binders
//! consume: element and text nodes with attributes, class lists, a narrow
//! set of writable properties, `change`/`input` event listeners with
//! synchronous dispatch, HTML fragment parsing and serialization,
//! document-order traversal, connectivity checks, and ancestor lookup by
//! attribute.
//!
//! Nodes are cheap `Arc` handles: cloning a handle shares the node, and
//! equality is identity. Children hold strong references, parents weak
//! ones, so detached subtrees are freed when the last handle drops.
//!
//! Form semantics mirror the host conventions the binders expect: setting
//! `checked` on a named radio clears the rest of its group, single-select
//! `set_value` moves the selection to the matching option, and `value()` on
//! a select resolves to the selected option's value.

mod document;
mod element;
mod event;
mod node;
mod parser;

pub use document::Document;
pub use element::{Element, Prop};
pub use event::{DomEvent, EventKind, EventListenerId};
pub use node::{Node, TextNode};
