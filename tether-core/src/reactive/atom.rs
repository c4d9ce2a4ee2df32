//! Atom Implementation
//!
//! An [`Atom`] is the fundamental scalar cell. It holds one value and an
//! ordered listener table.
//!
//! # How atoms work
//!
//! 1. [`Atom::set`] compares the incoming value against the current one.
//!    Equal writes are suppressed: the value is not replaced and nobody is
//!    notified. This is the change-suppression the two-way binders rely on
//!    to break DOM-write feedback loops.
//! 2. Unequal writes swap the value, then notify every listener in
//!    subscription order with a [`Change`] carrying the new and old values.
//! 3. Cloning an atom shares state: clones see each other's writes.
//!
//! Dispatch happens outside the value lock, so a listener may freely read
//! or write the atom (subject to suppression) and may unsubscribe itself.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::source::{Source, SourceMut, Track};
use super::subscription::{Change, Listener, ListenerSet, Unsubscriber};

/// A reactive scalar holding a value of type `T`.
///
/// # Example
///
/// ```rust,ignore
/// let label = Atom::new("hello".to_string());
/// label.set("world".to_string());   // listeners notified
/// label.set("world".to_string());   // suppressed, nobody notified
/// ```
pub struct Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<AtomInner<T>>,
}

struct AtomInner<T: Send + 'static> {
    value: RwLock<T>,
    listeners: ListenerSet<Change<T>>,
}

impl<T> Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(AtomInner {
                value: RwLock::new(value),
                listeners: ListenerSet::new(),
            }),
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Replace the value and notify listeners. Suppressed when the new
    /// value equals the current one.
    pub fn set(&self, value: T) {
        let old_value = {
            let mut guard = self.inner.value.write();
            if *guard == value {
                return;
            }
            let old_value = guard.clone();
            *guard = value.clone();
            old_value
        };

        self.inner.listeners.emit(&Change {
            value,
            old_value: Some(old_value),
        });
    }

    /// Update the value using a function of the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = {
            let guard = self.inner.value.read();
            f(&guard)
        };
        self.set(next);
    }
}

impl<T> Source<T> for Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn get(&self) -> T {
        Atom::get(self)
    }

    fn subscribe(&self, listener: Listener<T>, debounce: Duration) -> Unsubscriber {
        self.inner.listeners.add(listener, debounce)
    }
}

impl<T> SourceMut<T> for Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn set(&self, value: T) {
        Atom::set(self, value)
    }
}

impl<T> Track for Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn on_change(
        &self,
        callback: Arc<dyn Fn() + Send + Sync>,
        debounce: Duration,
    ) -> Unsubscriber {
        self.inner
            .listeners
            .add(Arc::new(move |_: &Change<T>| (callback.as_ref())()), debounce)
    }
}

impl<T> Clone for Atom<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Atom<T>
where
    T: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Atom").field("value", &self.get()).finish()
    }
}
