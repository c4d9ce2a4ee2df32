//! Attribute binder.

use tracing::warn;

use super::binder::attach;
use crate::dom::Element;
use crate::options::BindOptions;
use crate::reactive::{Source, Unsubscriber};
use crate::value::{ToValue, Value};

/// Bind a reactive value to one of the element's attributes. A string sets
/// the attribute, null removes it; anything else is a contract violation
/// and is skipped with a warning.
pub fn bind_to_attr<S, T>(
    source: &S,
    element: &Element,
    attribute_name: &str,
    options: &BindOptions,
) -> Unsubscriber
where
    S: Source<T> + Clone + 'static,
    T: ToValue + Clone + Send + Sync + 'static,
{
    let attribute_name = attribute_name.to_string();
    attach(
        source,
        element,
        move |source: &S, element: &Element, _options: &BindOptions| {
            match source.get().to_value() {
                Value::Str(text) => element.set_attribute(&attribute_name, &text),
                Value::Null => element.remove_attribute(&attribute_name),
                other => warn!(
                    attribute = %attribute_name,
                    found = other.type_name(),
                    "ignoring non-string attribute write"
                ),
            }
        },
        options,
    )
}
