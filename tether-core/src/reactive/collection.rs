//! Collection Implementation
//!
//! A [`Collection`] is an array-like cell with fine-grained change events.
//! Consumers such as the list reconciliation engine do not diff whole
//! arrays; they receive [`ListChange`] events describing exactly what
//! happened.
//!
//! # Event sequences
//!
//! Each mutator emits a fixed sequence, with index writes always delivered
//! before the length write:
//!
//! - `set(values)`: one `Replace` (suppressed when the new array equals the
//!   current one);
//! - `push(value)`: `Set { index: old_len }`, then `Resize`;
//! - `pop()`: `Remove { index: len - 1 }`, then `Resize`;
//! - `splice(start, delete_count, replacement)`: `Set` for every surviving
//!   index whose value changed, `Remove` (descending) for tail indices
//!   truncated by a shrink, then `Resize` when the length changed;
//! - `update_item(index, value)`: one `Set` (suppressed on equal value).
//!
//! All events for one mutation are delivered before the mutator returns.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::source::Track;
use super::subscription::{ListChange, ListListener, ListenerSet, Unsubscriber};

/// A reactive array of `T` with per-index change notifications.
pub struct Collection<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<CollectionInner<T>>,
}

struct CollectionInner<T: Send + 'static> {
    items: RwLock<Vec<T>>,
    listeners: ListenerSet<ListChange<T>>,
}

impl<T> Collection<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                items: RwLock::new(items),
                listeners: ListenerSet::new(),
            }),
        }
    }

    /// A snapshot of the current items.
    pub fn get(&self) -> Vec<T> {
        self.inner.items.read().clone()
    }

    /// The item at `index`, if any.
    pub fn item(&self, index: usize) -> Option<T> {
        self.inner.items.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// Register a change listener with a per-subscription debounce window.
    pub fn subscribe(&self, listener: ListListener<T>, debounce: Duration) -> Unsubscriber {
        self.inner.listeners.add(listener, debounce)
    }

    /// Replace the whole array. Suppressed when equal to the current one.
    pub fn set(&self, values: Vec<T>) {
        {
            let mut guard = self.inner.items.write();
            if *guard == values {
                return;
            }
            *guard = values.clone();
        }
        self.inner.listeners.emit(&ListChange::Replace { values });
    }

    /// Append a value to the end.
    pub fn push(&self, value: T) {
        let index = {
            let mut guard = self.inner.items.write();
            guard.push(value.clone());
            guard.len() - 1
        };

        self.inner.listeners.emit(&ListChange::Set {
            index,
            value,
            old_value: None,
        });
        self.inner.listeners.emit(&ListChange::Resize { len: index + 1 });
    }

    /// Remove and return the last value.
    pub fn pop(&self) -> Option<T> {
        let (value, index) = {
            let mut guard = self.inner.items.write();
            let value = guard.pop()?;
            (value, guard.len())
        };

        self.inner.listeners.emit(&ListChange::Remove { index });
        self.inner.listeners.emit(&ListChange::Resize { len: index });
        Some(value)
    }

    /// Remove `delete_count` items starting at `start`, inserting
    /// `replacement` in their place. Returns the removed items.
    pub fn splice(&self, start: usize, delete_count: usize, replacement: Vec<T>) -> Vec<T> {
        let (removed, events) = {
            let mut guard = self.inner.items.write();
            let old = guard.clone();
            let start = start.min(old.len());
            let end = (start + delete_count).min(old.len());

            let mut next = Vec::with_capacity(old.len() - (end - start) + replacement.len());
            next.extend_from_slice(&old[..start]);
            next.extend(replacement);
            next.extend_from_slice(&old[end..]);

            let removed = old[start..end].to_vec();
            let mut events = Vec::new();

            for index in start..next.len() {
                match old.get(index) {
                    Some(old_value) if *old_value == next[index] => {}
                    Some(old_value) => events.push(ListChange::Set {
                        index,
                        value: next[index].clone(),
                        old_value: Some(old_value.clone()),
                    }),
                    None => events.push(ListChange::Set {
                        index,
                        value: next[index].clone(),
                        old_value: None,
                    }),
                }
            }
            for index in (next.len()..old.len()).rev() {
                events.push(ListChange::Remove { index });
            }
            if next.len() != old.len() {
                events.push(ListChange::Resize { len: next.len() });
            }

            *guard = next;
            (removed, events)
        };

        for event in &events {
            self.inner.listeners.emit(event);
        }
        removed
    }

    /// Write a single index. Out-of-range writes and equal values are
    /// ignored.
    pub fn update_item(&self, index: usize, value: T) {
        let old_value = {
            let mut guard = self.inner.items.write();
            match guard.get(index) {
                Some(current) if *current != value => {
                    let old_value = current.clone();
                    guard[index] = value.clone();
                    old_value
                }
                _ => return,
            }
        };

        self.inner.listeners.emit(&ListChange::Set {
            index,
            value,
            old_value: Some(old_value),
        });
    }
}

impl<T> Track for Collection<T>
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
            .add(Arc::new(move |_: &ListChange<T>| (callback.as_ref())()), debounce)
    }
}

impl<T> Clone for Collection<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Collection<T>
where
    T: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("items", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn record_events<T>(collection: &Collection<T>) -> Arc<Mutex<Vec<String>>>
    where
        T: Clone + PartialEq + Send + Sync + Debug + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        collection.subscribe(
            Arc::new(move |change: &ListChange<T>| {
                let line = match change {
                    ListChange::Replace { values } => format!("replace({})", values.len()),
                    ListChange::Resize { len } => format!("resize({len})"),
                    ListChange::Set { index, .. } => format!("set({index})"),
                    ListChange::Remove { index } => format!("remove({index})"),
                };
                log_clone.lock().push(line);
            }),
            Duration::ZERO,
        );
        log
    }

    #[test]
    fn push_emits_set_then_resize() {
        let collection = Collection::new(Vec::<String>::new());
        let log = record_events(&collection);

        collection.push("a".to_string());
        assert_eq!(*log.lock(), vec!["set(0)", "resize(1)"]);
    }

    #[test]
    fn pop_emits_remove_then_resize() {
        let collection = Collection::new(vec![1, 2, 3]);
        let log = record_events(&collection);

        assert_eq!(collection.pop(), Some(3));
        assert_eq!(*log.lock(), vec!["remove(2)", "resize(2)"]);
        assert_eq!(collection.get(), vec![1, 2]);
    }

    #[test]
    fn splice_shifts_then_truncates_then_resizes() {
        let collection = Collection::new(vec!["0", "1", "5"]);
        let log = record_events(&collection);

        let removed = collection.splice(1, 1, Vec::new());
        assert_eq!(removed, vec!["1"]);
        assert_eq!(collection.get(), vec!["0", "5"]);
        assert_eq!(*log.lock(), vec!["set(1)", "remove(2)", "resize(2)"]);
    }

    #[test]
    fn splice_can_insert() {
        let collection = Collection::new(vec![1, 4]);
        collection.splice(1, 0, vec![2, 3]);
        assert_eq!(collection.get(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn whole_replace_is_suppressed_when_equal() {
        let collection = Collection::new(vec![1, 2]);
        let log = record_events(&collection);

        collection.set(vec![1, 2]);
        assert!(log.lock().is_empty());

        collection.set(vec![2, 1]);
        assert_eq!(*log.lock(), vec!["replace(2)"]);
    }

    #[test]
    fn update_item_ignores_out_of_range_and_equal() {
        let collection = Collection::new(vec!["a".to_string()]);
        let log = record_events(&collection);

        collection.update_item(5, "x".to_string());
        collection.update_item(0, "a".to_string());
        assert!(log.lock().is_empty());

        collection.update_item(0, "b".to_string());
        assert_eq!(*log.lock(), vec!["set(0)"]);
        assert_eq!(collection.get(), vec!["b".to_string()]);
    }
}
