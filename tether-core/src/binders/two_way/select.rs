//! Single-select binder.

use std::sync::{Arc, OnceLock};

use crate::dom::{DomEvent, Element, EventKind};
use crate::options::BindOptions;
use crate::reactive::{Change, SourceMut, Unsubscriber};
use crate::value::{FromValue, ToValue, Value};

/// Synchronize a reactive string with a single-select element's value.
pub fn bind_to_select_element<S, T>(
    source: &S,
    select_element: &Element,
    options: &BindOptions,
) -> Unsubscriber
where
    S: SourceMut<T> + Clone + 'static,
    T: ToValue + FromValue + Clone + Send + Sync + 'static,
{
    select_element.set_value(&source.get().to_value().to_string());

    let listener_id = select_element.add_event_listener(
        EventKind::Change,
        Arc::new({
            let source = source.clone();
            move |event: &DomEvent| {
                source.set(T::from_value(Value::Str(event.target.value())));
            }
        }),
    );

    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);
    let watched = select_element.clone();
    let autodisconnect = options.autodisconnect;

    let subscription = source.subscribe(
        Arc::new(move |change: &Change<T>| {
            if autodisconnect && !watched.is_connected() {
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }
            watched.set_value(&change.value.to_value().to_string());
        }),
        options.debounce_time,
    );

    let unsubscriber = Unsubscriber::new({
        let select_element = select_element.clone();
        move || {
            select_element.remove_event_listener(listener_id);
            subscription.unsubscribe();
        }
    });
    let _ = handle.set(unsubscriber.clone());
    unsubscriber
}
