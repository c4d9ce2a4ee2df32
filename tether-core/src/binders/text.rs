//! Text binder.

use super::binder::attach;
use crate::dom::Node;
use crate::options::BindOptions;
use crate::reactive::{Source, Unsubscriber};
use crate::value::ToValue;

/// Bind a reactive value to a node's text content. Works on elements and on
/// raw text nodes; the value is stringified on every write.
pub fn bind_to_text<S, T>(source: &S, node: &Node, options: &BindOptions) -> Unsubscriber
where
    S: Source<T> + Clone + 'static,
    T: ToValue + Clone + Send + Sync + 'static,
{
    attach(
        source,
        node,
        move |source: &S, node: &Node, _options: &BindOptions| {
            node.set_text_content(&source.get().to_value().to_string());
        },
        options,
    )
}
