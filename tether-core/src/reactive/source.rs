//! The traits binders are generic over.
//!
//! One-way binders accept any [`Source`]; two-way binders need write access
//! and require [`SourceMut`]. [`Track`] is the object-safe "tell me when
//! anything changed" view used for [`Computed`](super::Computed)
//! dependencies, where the concrete value types differ per dependency.

use std::sync::Arc;
use std::time::Duration;

use super::subscription::{Listener, Unsubscriber};

/// A readable reactive value cell.
pub trait Source<T>: Send + Sync {
    /// The current value.
    fn get(&self) -> T;

    /// Register a change listener with a per-subscription debounce window.
    fn subscribe(&self, listener: Listener<T>, debounce: Duration) -> Unsubscriber;
}

/// A writable reactive value cell. Writes of equal values are suppressed.
pub trait SourceMut<T>: Source<T> {
    fn set(&self, value: T);
}

/// Type-erased change tracking, independent of the cell's value type.
pub trait Track: Send + Sync {
    /// Invoke `callback` after every delivered change.
    fn on_change(&self, callback: Arc<dyn Fn() + Send + Sync>, debounce: Duration)
        -> Unsubscriber;
}
