//! Error Types
//!
//! Every fatal condition in the crate is a configuration or type-contract
//! failure discovered while constructing a binding, and all of them surface
//! synchronously as a [`BindError`] from the constructing call. There is no
//! internal retry and no aggregation: the first violation aborts the call
//! that discovered it.

use thiserror::Error;

/// Fatal binder and template construction errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    /// A compiled template expanded to zero or more than one top-level node.
    #[error("template must contain exactly one top-level node, found {found}")]
    TemplateRootCount { found: usize },

    /// The literal parts and expressions of a template do not interleave.
    #[error("template with {expressions} expressions requires {} literal parts, got {literals}", .expressions + 1)]
    TemplateArity { literals: usize, expressions: usize },

    /// A directive was handed a reactive value of the wrong type.
    #[error("`{directive}` requires a {expected} value, got {found}")]
    DirectiveType {
        directive: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A text placeholder resolved to something other than a string or number.
    #[error("text binding requires a string or number value, got {found}")]
    TextType { found: &'static str },

    /// A plain attribute placeholder resolved to something other than a
    /// string or null.
    #[error("attribute `{name}` requires a string or null value, got {found}")]
    AttributeType { name: String, found: &'static str },

    /// A list binding has neither an item factory nor an existing child
    /// element to capture as a template.
    #[error("list binding requires an item factory or an existing child element to use as a template")]
    MissingItemTemplate,
}
