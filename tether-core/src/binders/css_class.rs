//! CSS-class toggle binder.

use super::binder::attach;
use crate::dom::Element;
use crate::options::{BindOptions, CssClassOptions};
use crate::reactive::{Source, Unsubscriber};
use crate::value::ToValue;

/// Bind a reactive boolean to the presence of one CSS class.
///
/// With the default polarity the class is present iff the value is truthy;
/// `remove_class` inverts that, so the class is present iff the value is
/// falsy.
pub fn bind_to_css_class<S, T>(
    source: &S,
    element: &Element,
    class_name: &str,
    options: &CssClassOptions,
) -> Unsubscriber
where
    S: Source<T> + Clone + 'static,
    T: ToValue + Clone + Send + Sync + 'static,
{
    let class_name = class_name.to_string();
    let remove_class = options.remove_class;
    attach(
        source,
        element,
        move |source: &S, element: &Element, _options: &BindOptions| {
            let truthy = source.get().to_value().truthy();
            let force = if remove_class { !truthy } else { truthy };
            element.class_list_toggle(&class_name, force);
        },
        &options.bind,
    )
}
