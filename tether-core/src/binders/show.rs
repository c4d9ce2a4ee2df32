//! Show/hide binder.

use super::css_class::bind_to_css_class;
use crate::dom::Element;
use crate::options::{CssClassOptions, ShowOptions};
use crate::reactive::{Source, Unsubscriber};
use crate::value::ToValue;

/// Bind a reactive boolean to the element's visibility: the configured hide
/// class (default `"d-none"`) is present while the value is falsy.
pub fn bind_to_show<S, T>(source: &S, element: &Element, options: &ShowOptions) -> Unsubscriber
where
    S: Source<T> + Clone + 'static,
    T: ToValue + Clone + Send + Sync + 'static,
{
    let css_options = CssClassOptions {
        bind: options.bind.clone(),
        remove_class: options.remove_class,
    };
    bind_to_css_class(source, element, &options.hide_class_name, &css_options)
}
