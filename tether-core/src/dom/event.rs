//! DOM events consumed by the two-way binders.

use super::element::Element;

/// The event kinds the binding layer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fires per keystroke on text inputs.
    Input,
    /// Fires on commit: checkbox toggles, select changes, input blur.
    Change,
}

/// A dispatched event. Dispatch is synchronous and does not bubble; binders
/// attach directly to the elements they watch.
#[derive(Clone)]
pub struct DomEvent {
    pub target: Element,
    pub kind: EventKind,
}

/// Handle identifying one registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventListenerId(pub(crate) u64);
