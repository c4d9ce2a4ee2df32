//! Reactive Primitives
//!
//! This module implements the observable state cells the binders consume:
//! atoms, computed values, and collections.
//!
//! # Concepts
//!
//! ## Atoms
//!
//! An [`Atom`] is a container for a single mutable value. Writing a value
//! that compares equal to the current one is suppressed entirely: nobody is
//! notified. Two-way binders rely on this suppression for loop prevention:
//! the echo of a DOM-originated write arrives as an equal value and dies
//! there.
//!
//! ## Computed values
//!
//! A [`Computed`] is a derived read-only cell. It re-evaluates whenever one
//! of its declared dependencies changes and notifies its own subscribers
//! only when the derived value actually changed.
//!
//! ## Collections
//!
//! A [`Collection`] is an array-like cell with fine-grained change events:
//! whole-value replacement, size-only changes, per-index writes, and
//! per-index removals (see [`ListChange`]). The list reconciliation engine
//! and the multi-select binder consume these directly instead of diffing
//! whole arrays.
//!
//! # Subscriptions
//!
//! Every `subscribe` returns an [`Unsubscriber`]. Listeners fire
//! synchronously in subscription order; a per-subscription debounce window
//! coalesces rapid notifications to one trailing delivery carrying the
//! latest change. Unsubscribing detaches the listener and discards any
//! pending debounced delivery.

mod atom;
mod collection;
mod computed;
mod source;
mod subscription;

pub use atom::Atom;
pub use collection::Collection;
pub use computed::Computed;
pub use source::{Source, SourceMut, Track};
pub use subscription::{Change, ListChange, ListListener, Listener, Unsubscriber};
