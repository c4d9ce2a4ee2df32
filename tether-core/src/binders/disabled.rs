//! Disabled binder.

use super::property::bind_to_property;
use crate::dom::{Element, Prop};
use crate::options::BindOptions;
use crate::reactive::{Source, Unsubscriber};
use crate::value::ToValue;

/// Bind a reactive boolean to the element's `disabled` property. Meant for
/// form-control-like elements.
pub fn bind_to_disabled<S, T>(source: &S, element: &Element, options: &BindOptions) -> Unsubscriber
where
    S: Source<T> + Clone + 'static,
    T: ToValue + Clone + Send + Sync + 'static,
{
    bind_to_property(source, element, Prop::Disabled, options)
}
