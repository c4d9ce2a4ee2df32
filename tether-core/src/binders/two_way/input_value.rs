//! Input-value binder.
//!
//! Text, textarea and number inputs. The DOM side listens for `input` (per
//! keystroke) unless lazy mode is on; number inputs are always lazy and
//! parse through float parsing, so a non-numeric entry writes `NaN` into
//! the source. The DOM-to-source direction runs through its own debounce
//! using the configured window, independent of the subscribe-side debounce.

use std::sync::{Arc, OnceLock};

use crate::debounce::Debounced;
use crate::dom::{DomEvent, Element, EventKind};
use crate::options::InputOptions;
use crate::reactive::{Change, SourceMut, Unsubscriber};
use crate::value::{FromValue, ToValue, Value};

/// Synchronize a reactive string or number with an input's `value`.
pub fn bind_to_input_value<S, T>(
    source: &S,
    element: &Element,
    options: &InputOptions,
) -> Unsubscriber
where
    S: SourceMut<T> + Clone + 'static,
    T: ToValue + FromValue + Clone + Send + Sync + 'static,
{
    let is_number = element.input_type() == "number";
    // Number inputs commit on change regardless of the configured laziness.
    let lazy = options.lazy || is_number;

    let write_value = {
        let element = element.clone();
        move |value: &Value| {
            let text = if is_number {
                value.coerce_number().to_string()
            } else {
                value.to_string()
            };
            // skip identical writes; in-progress edits stay untouched
            if element.value() != text {
                element.set_value(&text);
            }
        }
    };
    write_value(&source.get().to_value());

    let read_back = Debounced::new(options.bind.debounce_time, {
        let source = source.clone();
        let element = element.clone();
        move |_: ()| {
            let text = element.value();
            if is_number {
                source.set(T::from_value(Value::Num(
                    Value::Str(text).coerce_number(),
                )));
            } else {
                source.set(T::from_value(Value::Str(text)));
            }
        }
    });

    let listener_id = element.add_event_listener(
        if lazy { EventKind::Change } else { EventKind::Input },
        Arc::new({
            let read_back = read_back.clone();
            move |_event: &DomEvent| read_back.call(())
        }),
    );

    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);
    let watched = element.clone();
    let autodisconnect = options.bind.autodisconnect;

    let subscription = source.subscribe(
        Arc::new(move |change: &Change<T>| {
            if autodisconnect && !watched.is_connected() {
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }
            write_value(&change.value.to_value());
        }),
        options.bind.debounce_time,
    );

    let unsubscriber = Unsubscriber::new({
        let element = element.clone();
        move || {
            element.remove_event_listener(listener_id);
            read_back.cancel();
            subscription.unsubscribe();
        }
    });
    let _ = handle.set(unsubscriber.clone());
    unsubscriber
}
