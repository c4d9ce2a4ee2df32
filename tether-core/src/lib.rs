//! Tether Core
//!
//! This crate provides the core runtime for the Tether reactive DOM
//! data-binding layer. It implements:
//!
//! - Reactive primitives (atoms, computed values, collections)
//! - One-way and two-way element binders
//! - A list reconciliation engine driven by fine-grained collection events
//! - A template compiler turning tagged-template-style input into live,
//!   disposable DOM fragments
//! - An in-memory host document the bindings run against
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: observable cells with subscription-based change delivery
//! - `dom`: the host document (nodes, attributes, events, fragment parsing)
//! - `binders`: the synchronization layer between sources and DOM aspects
//! - `template`: placeholder discovery, directive dispatch, fragments
//!
//! Data flows from the template compiler (which produces DOM plus a
//! placeholder map) through the binders, each of which subscribes to its
//! source and performs one DOM write per notification; two-way binders also
//! listen for DOM events and write user edits back into their source.
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_core::{html, Atom, BindOptions, Document, TemplateExpr};
//!
//! let document = Document::new();
//! let greeting = Atom::new("hi".to_string());
//!
//! let fragment = html(
//!     &document,
//!     &["<span ref=\"tmp\">", "</span>"],
//!     vec![TemplateExpr::from(&greeting)],
//!     &BindOptions::default(),
//! )?;
//!
//! document.body().append_child(fragment.root.clone());
//! greeting.set("bye".to_string());   // the live text node updates
//! fragment.unsubscribe();            // tear every binding down
//! ```

pub mod binders;
pub mod debounce;
pub mod diff;
pub mod dom;
pub mod error;
pub mod options;
pub mod reactive;
pub mod template;
pub mod value;

// Re-export the public surface flat, one name per binder.
pub use binders::{
    bind_to_attr, bind_to_checkbox, bind_to_checkbox_values, bind_to_class_name,
    bind_to_css_class, bind_to_disabled, bind_to_html, bind_to_input_value, bind_to_list,
    bind_to_multiple_select, bind_to_property, bind_to_radios, bind_to_select_element,
    bind_to_show, bind_to_text, ListItemHelper, ListItemSetterDetails,
};
pub use debounce::Debounced;
pub use diff::get_diffs;
pub use dom::{Document, DomEvent, Element, EventKind, EventListenerId, Node, Prop, TextNode};
pub use error::BindError;
pub use options::{BindOptions, CssClassOptions, InputOptions, ShowOptions};
pub use reactive::{
    Atom, Change, Collection, Computed, ListChange, ListListener, Listener, Source, SourceMut,
    Track, Unsubscriber,
};
pub use template::{html, DynSource, Fragment, TemplateCompiler, TemplateExpr};
pub use value::{FromValue, ToValue, Value};
