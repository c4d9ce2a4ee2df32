//! Checkbox binder.

use std::sync::{Arc, OnceLock};

use crate::dom::{DomEvent, Element, EventKind};
use crate::options::BindOptions;
use crate::reactive::{Change, SourceMut, Unsubscriber};
use crate::value::{FromValue, ToValue, Value};

/// Synchronize a reactive boolean with a checkbox's `checked` state.
pub fn bind_to_checkbox<S, T>(
    source: &S,
    checkbox: &Element,
    options: &BindOptions,
) -> Unsubscriber
where
    S: SourceMut<T> + Clone + 'static,
    T: ToValue + FromValue + Clone + Send + Sync + 'static,
{
    checkbox.set_checked(source.get().to_value().truthy());

    let listener_id = checkbox.add_event_listener(
        EventKind::Change,
        Arc::new({
            let source = source.clone();
            move |event: &DomEvent| {
                source.set(T::from_value(Value::Bool(event.target.checked())));
            }
        }),
    );

    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);
    let watched = checkbox.clone();
    let autodisconnect = options.autodisconnect;

    let subscription = source.subscribe(
        Arc::new(move |change: &Change<T>| {
            if autodisconnect && !watched.is_connected() {
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }
            watched.set_checked(change.value.to_value().truthy());
        }),
        options.debounce_time,
    );

    let unsubscriber = Unsubscriber::new({
        let checkbox = checkbox.clone();
        move || {
            checkbox.remove_event_listener(listener_id);
            subscription.unsubscribe();
        }
    });
    let _ = handle.set(unsubscriber.clone());
    unsubscriber
}
