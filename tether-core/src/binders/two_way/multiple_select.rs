//! Multi-select binder.
//!
//! The source is a collection of selected values. Fine-grained events
//! toggle exactly the option at the affected index; whole-value
//! replacement and size changes trigger a full membership rescan over all
//! options. After either branch an additive membership pass runs, marking
//! every option whose value is in the collection as selected.

use std::sync::{Arc, OnceLock};

use crate::dom::{DomEvent, Element, EventKind};
use crate::options::BindOptions;
use crate::reactive::{Collection, ListChange, Unsubscriber};

/// Synchronize a collection of values with a multi-select's selection.
pub fn bind_to_multiple_select(
    collection: &Collection<String>,
    select_element: &Element,
    options: &BindOptions,
) -> Unsubscriber {
    let additive_sync = {
        let collection = collection.clone();
        let select_element = select_element.clone();
        move || {
            let values = collection.get();
            for option in select_element.options() {
                if !option.selected() && values.iter().any(|value| *value == option.value()) {
                    option.set_selected(true);
                }
            }
        }
    };
    additive_sync();

    let listener_id = select_element.add_event_listener(
        EventKind::Change,
        Arc::new({
            let collection = collection.clone();
            move |event: &DomEvent| {
                let values: Vec<String> = event
                    .target
                    .selected_options()
                    .iter()
                    .map(Element::value)
                    .collect();
                collection.set(values);
            }
        }),
    );

    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);
    let watched = select_element.clone();
    let subscribed_collection = collection.clone();
    let autodisconnect = options.autodisconnect;

    let subscription = collection.subscribe(
        Arc::new(move |change: &ListChange<String>| {
            if autodisconnect && !watched.is_connected() {
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }

            match change {
                ListChange::Set { index, .. } => {
                    if let Some(option) = watched.options().get(*index) {
                        if !option.selected() {
                            option.set_selected(true);
                        }
                    }
                }
                ListChange::Remove { index } => {
                    if let Some(option) = watched.options().get(*index) {
                        if option.selected() {
                            option.set_selected(false);
                        }
                    }
                }
                ListChange::Replace { .. } | ListChange::Resize { .. } => {
                    let values = subscribed_collection.get();
                    for option in watched.options() {
                        option.set_selected(values.iter().any(|value| *value == option.value()));
                    }
                }
            }

            additive_sync();
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
