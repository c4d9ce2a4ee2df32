//! Checkbox-group binder.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::dom::{DomEvent, Element, EventKind, EventListenerId};
use crate::options::BindOptions;
use crate::reactive::{Collection, ListChange, Unsubscriber};

/// Synchronize a collection of strings with a fixed group of checkboxes.
///
/// Membership is keyed by each checkbox's `value` attribute, captured once
/// at bind time. Any checkbox change rescans the whole group and assigns
/// the collection wholesale; any collection change re-syncs every
/// checkbox's `checked` from membership.
pub fn bind_to_checkbox_values(
    collection: &Collection<String>,
    checkboxes: &[Element],
    options: &BindOptions,
) -> Unsubscriber {
    if checkboxes.is_empty() {
        return Unsubscriber::noop();
    }

    let by_value: IndexMap<String, Element> = checkboxes
        .iter()
        .map(|checkbox| (checkbox.value(), checkbox.clone()))
        .collect();

    let sync = {
        let collection = collection.clone();
        let by_value = by_value.clone();
        move || {
            let values = collection.get();
            for (value, checkbox) in &by_value {
                checkbox.set_checked(values.iter().any(|member| member == value));
            }
        }
    };
    sync();

    let handler: Arc<dyn Fn(&DomEvent) + Send + Sync> = Arc::new({
        let collection = collection.clone();
        let checkboxes: Vec<Element> = checkboxes.to_vec();
        move |_event: &DomEvent| {
            let values: Vec<String> = checkboxes
                .iter()
                .filter(|checkbox| checkbox.checked())
                .map(|checkbox| checkbox.value())
                .collect();
            collection.set(values);
        }
    });

    let listener_ids: Vec<(Element, EventListenerId)> = checkboxes
        .iter()
        .map(|checkbox| {
            (
                checkbox.clone(),
                checkbox.add_event_listener(EventKind::Change, Arc::clone(&handler)),
            )
        })
        .collect();

    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);
    let probe = checkboxes[0].clone();
    let autodisconnect = options.autodisconnect;

    let subscription = collection.subscribe(
        Arc::new(move |_change: &ListChange<String>| {
            if autodisconnect && !probe.is_connected() {
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }
            sync();
        }),
        options.debounce_time,
    );

    let unsubscriber = Unsubscriber::new(move || {
        for (checkbox, id) in &listener_ids {
            checkbox.remove_event_listener(*id);
        }
        subscription.unsubscribe();
    });
    let _ = handle.set(unsubscriber.clone());
    unsubscriber
}
