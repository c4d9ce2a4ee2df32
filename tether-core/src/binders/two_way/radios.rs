//! Radio-group binder.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::dom::{DomEvent, Element, EventKind, EventListenerId};
use crate::options::BindOptions;
use crate::reactive::{Change, SourceMut, Unsubscriber};
use crate::value::{FromValue, ToValue, Value};

/// Synchronize a reactive string with a group of radio inputs sharing one
/// `name`.
///
/// An empty radio list or an empty group name yields a harmless no-op
/// binder. Radios whose `name` differs from the group's or whose `value`
/// is empty are left out of the source-to-DOM map, though their change
/// events still write through.
pub fn bind_to_radios<S, T>(source: &S, radios: &[Element], options: &BindOptions) -> Unsubscriber
where
    S: SourceMut<T> + Clone + 'static,
    T: ToValue + FromValue + Clone + Send + Sync + 'static,
{
    if radios.is_empty() {
        return Unsubscriber::noop();
    }
    let group_name = radios[0].name();
    if group_name.is_empty() {
        return Unsubscriber::noop();
    }

    let by_value: IndexMap<String, Element> = radios
        .iter()
        .filter(|radio| radio.name() == group_name && !radio.value().is_empty())
        .map(|radio| (radio.value(), radio.clone()))
        .collect();

    let check = {
        let by_value = by_value.clone();
        move |value: &Value| {
            if let Some(radio) = by_value.get(&value.to_string()) {
                radio.set_checked(true);
            }
        }
    };
    check(&source.get().to_value());

    let handler: Arc<dyn Fn(&DomEvent) + Send + Sync> = Arc::new({
        let source = source.clone();
        move |event: &DomEvent| {
            source.set(T::from_value(Value::Str(event.target.value())));
        }
    });

    let listener_ids: Vec<(Element, EventListenerId)> = radios
        .iter()
        .map(|radio| {
            (
                radio.clone(),
                radio.add_event_listener(EventKind::Change, Arc::clone(&handler)),
            )
        })
        .collect();

    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);
    let probe = radios[0].clone();
    let autodisconnect = options.autodisconnect;

    let subscription = source.subscribe(
        Arc::new(move |change: &Change<T>| {
            if autodisconnect && !probe.is_connected() {
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }
            check(&change.value.to_value());
        }),
        options.debounce_time,
    );

    let unsubscriber = Unsubscriber::new(move || {
        for (radio, id) in &listener_ids {
            radio.remove_event_listener(*id);
        }
        subscription.unsubscribe();
    });
    let _ = handle.set(unsubscriber.clone());
    unsubscriber
}
