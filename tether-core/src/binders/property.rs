//! Property binder.
//!
//! The generic write path behind the className, html, and disabled binders:
//! one reactive source driving one entry of the element's narrow [`Prop`]
//! surface. Per-property coercion lives in [`Element::set_prop`].

use super::binder::attach;
use crate::dom::{Element, Prop};
use crate::options::BindOptions;
use crate::reactive::{Source, Unsubscriber};
use crate::value::ToValue;

/// Bind a reactive value to one of the element's writable properties.
pub fn bind_to_property<S, T>(
    source: &S,
    element: &Element,
    property: Prop,
    options: &BindOptions,
) -> Unsubscriber
where
    S: Source<T> + Clone + 'static,
    T: ToValue + Clone + Send + Sync + 'static,
{
    attach(
        source,
        element,
        move |source: &S, element: &Element, _options: &BindOptions| {
            element.set_prop(property, &source.get().to_value());
        },
        options,
    )
}
