//! Change descriptors, listener tables, and subscription handles.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::debounce::Debounced;

/// A scalar change notification.
#[derive(Debug, Clone)]
pub struct Change<T> {
    /// The value after the change.
    pub value: T,
    /// The value before the change; `None` on synthetic initial deliveries.
    pub old_value: Option<T>,
}

/// A fine-grained collection change notification: whole-value replacement,
/// size-only change, indexed write, indexed removal.
#[derive(Debug, Clone)]
pub enum ListChange<T> {
    /// The whole array was replaced.
    Replace { values: Vec<T> },
    /// Only the length changed; element events for the same mutation have
    /// already been delivered.
    Resize { len: usize },
    /// The element at `index` was written.
    Set {
        index: usize,
        value: T,
        old_value: Option<T>,
    },
    /// The element at `index` was removed. Later `Set`/`Resize` events
    /// reconcile the remaining positions.
    Remove { index: usize },
}

/// A scalar change listener.
pub type Listener<T> = Arc<dyn Fn(&Change<T>) + Send + Sync>;

/// A collection change listener.
pub type ListListener<T> = Arc<dyn Fn(&ListChange<T>) + Send + Sync>;

/// Handle that detaches a subscription (and, for binders, the DOM listener
/// wired alongside it).
///
/// The teardown closure runs at most once: the handle is guarded by an
/// atomic flag, so calling [`Unsubscriber::unsubscribe`] a second time is a
/// no-op rather than undefined behavior. Clones share the flag.
#[derive(Clone)]
pub struct Unsubscriber {
    inner: Arc<UnsubscriberInner>,
}

struct UnsubscriberInner {
    spent: AtomicBool,
    teardown: Box<dyn Fn() + Send + Sync>,
}

impl Unsubscriber {
    pub fn new<F>(teardown: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(UnsubscriberInner {
                spent: AtomicBool::new(false),
                teardown: Box::new(teardown),
            }),
        }
    }

    /// An unsubscriber that does nothing, returned by binders that had
    /// nothing to bind.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Aggregate several unsubscribers into one.
    pub fn merge<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Unsubscriber>,
    {
        let parts: Vec<Unsubscriber> = parts.into_iter().collect();
        Self::new(move || {
            for part in &parts {
                part.unsubscribe();
            }
        })
    }

    /// Run the teardown. Subsequent calls are no-ops.
    pub fn unsubscribe(&self) {
        if !self.inner.spent.swap(true, Ordering::SeqCst) {
            (self.inner.teardown)();
        }
    }
}

impl fmt::Debug for Unsubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscriber")
            .field("spent", &self.inner.spent.load(Ordering::SeqCst))
            .finish()
    }
}

/// Counter for subscription ids, shared by every listener table.
static SUBSCRIPTION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_subscription_id() -> u64 {
    SUBSCRIPTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// How a listener entry receives events: directly, or through a debounce
/// wrapper holding the latest event.
enum Deliver<E: Send + 'static> {
    Direct(Arc<dyn Fn(&E) + Send + Sync>),
    Debounced(Debounced<E>),
}

impl<E: Clone + Send + 'static> Deliver<E> {
    fn deliver(&self, event: &E) {
        match self {
            Deliver::Direct(listener) => (listener.as_ref())(event),
            Deliver::Debounced(debounced) => debounced.call(event.clone()),
        }
    }
}

struct ListenerEntry<E: Send + 'static> {
    id: u64,
    deliver: Arc<Deliver<E>>,
}

/// An ordered table of listeners shared by atoms, computed values, and
/// collections. Dispatch snapshots the table first, so a listener may
/// unsubscribe itself (or anyone else) mid-notification.
pub(crate) struct ListenerSet<E: Send + 'static> {
    entries: Arc<RwLock<Vec<ListenerEntry<E>>>>,
}

impl<E: Clone + Send + 'static> ListenerSet<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub(crate) fn add(
        &self,
        listener: Arc<dyn Fn(&E) + Send + Sync>,
        debounce: Duration,
    ) -> Unsubscriber {
        let id = next_subscription_id();
        let deliver = if debounce.is_zero() {
            Arc::new(Deliver::Direct(listener))
        } else {
            let target = listener;
            Arc::new(Deliver::Debounced(Debounced::new(debounce, move |event: E| {
                (target.as_ref())(&event)
            })))
        };

        self.entries.write().push(ListenerEntry {
            id,
            deliver: Arc::clone(&deliver),
        });

        let entries = Arc::clone(&self.entries);
        Unsubscriber::new(move || {
            entries.write().retain(|entry| entry.id != id);
            if let Deliver::Debounced(debounced) = deliver.as_ref() {
                debounced.cancel();
            }
        })
    }

    /// Notify every listener, in subscription order.
    pub(crate) fn emit(&self, event: &E) {
        let snapshot: Vec<Arc<Deliver<E>>> = self
            .entries
            .read()
            .iter()
            .map(|entry| Arc::clone(&entry.deliver))
            .collect();

        for deliver in snapshot {
            deliver.deliver(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
