//! Computed Implementation
//!
//! A [`Computed`] is a derived, read-only cell. It holds a compute closure
//! and a list of dependencies; whenever any dependency delivers a change the
//! closure re-runs, and the computed's own listeners are notified only when
//! the derived value actually changed.
//!
//! Dependencies are declared explicitly as [`Track`] handles, which erases
//! their value types, so an atom of strings and a collection of numbers can
//! feed the same computed. The dependency subscriptions hold only a weak
//! reference back to the computed, so dropping every clone of the computed
//! releases it (and its `Drop` detaches the dependency subscriptions).

use std::fmt::Debug;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use super::source::{Source, Track};
use super::subscription::{Change, Listener, ListenerSet, Unsubscriber};

/// A derived read-only value, recomputed when a dependency changes.
///
/// # Example
///
/// ```rust,ignore
/// let first = Atom::new("Ada".to_string());
/// let last = Atom::new("Lovelace".to_string());
///
/// let full = {
///     let (first, last) = (first.clone(), last.clone());
///     Computed::new(move || format!("{} {}", first.get(), last.get()), &[&first, &last])
/// };
/// ```
pub struct Computed<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<ComputedInner<T>>,
}

struct ComputedInner<T: Send + 'static> {
    value: RwLock<T>,
    compute: Box<dyn Fn() -> T + Send + Sync>,
    listeners: ListenerSet<Change<T>>,
    /// Subscriptions to the declared dependencies, detached on drop.
    dependency_subscriptions: Mutex<Vec<Unsubscriber>>,
}

impl<T> Computed<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Build a computed from a compute closure and its dependencies. The
    /// closure runs once immediately to establish the initial value.
    pub fn new<F>(compute: F, dependencies: &[&dyn Track]) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let initial = compute();
        let inner = Arc::new(ComputedInner {
            value: RwLock::new(initial),
            compute: Box::new(compute),
            listeners: ListenerSet::new(),
            dependency_subscriptions: Mutex::new(Vec::new()),
        });

        let subscriptions: Vec<Unsubscriber> = dependencies
            .iter()
            .map(|dependency| {
                let weak: Weak<ComputedInner<T>> = Arc::downgrade(&inner);
                dependency.on_change(
                    Arc::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            ComputedInner::refresh(&inner);
                        }
                    }),
                    Duration::ZERO,
                )
            })
            .collect();
        *inner.dependency_subscriptions.lock() = subscriptions;

        Self { inner }
    }

    /// The current derived value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }
}

impl<T> ComputedInner<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn refresh(inner: &Arc<ComputedInner<T>>) {
        let next = (inner.compute)();
        let old_value = {
            let mut guard = inner.value.write();
            if *guard == next {
                return;
            }
            let old_value = guard.clone();
            *guard = next.clone();
            old_value
        };

        inner.listeners.emit(&Change {
            value: next,
            old_value: Some(old_value),
        });
    }
}

impl<T: Send + 'static> Drop for ComputedInner<T> {
    fn drop(&mut self) {
        for subscription in self.dependency_subscriptions.lock().iter() {
            subscription.unsubscribe();
        }
    }
}

impl<T> Source<T> for Computed<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn get(&self) -> T {
        Computed::get(self)
    }

    fn subscribe(&self, listener: Listener<T>, debounce: Duration) -> Unsubscriber {
        self.inner.listeners.add(listener, debounce)
    }
}

impl<T> Track for Computed<T>
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

impl<T> Clone for Computed<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Computed<T>
where
    T: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("value", &self.get())
            .finish()
    }
}
