//! Trailing-Edge Debounce
//!
//! [`Debounced`] delays invoking its wrapped function until a quiescence
//! window elapses, keeping only the most recent call's payload. Re-scheduling
//! replaces the prior pending call, and [`Debounced::cancel`] discards it
//! explicitly.
//!
//! # How it works
//!
//! 1. Every [`Debounced::call`] stores the payload as the single pending
//!    value and bumps a generation counter.
//! 2. A sleeper thread is spawned for that generation. When it wakes it
//!    fires only if its generation is still current; otherwise a newer call
//!    or a cancel has bumped the counter, and the stale sleeper exits
//!    without doing anything.
//! 3. A zero window short-circuits: the function runs inline, synchronously.
//!
//! The pending payload and wrapped function live behind `Arc`, so a trailing
//! fire may run on its sleeper thread after the caller has moved on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

/// A trailing-edge, latest-call-wins debounce wrapper around a function.
pub struct Debounced<A: Send + 'static> {
    inner: Arc<DebounceInner<A>>,
    wait: Duration,
}

struct DebounceInner<A> {
    /// Bumped on every schedule and cancel; a sleeper only fires while its
    /// own generation is still the current one.
    generation: AtomicU64,
    pending: Mutex<Option<A>>,
    call: Box<dyn Fn(A) + Send + Sync>,
}

impl<A: Send + 'static> Debounced<A> {
    pub fn new<F>(wait: Duration, call: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(DebounceInner {
                generation: AtomicU64::new(0),
                pending: Mutex::new(None),
                call: Box::new(call),
            }),
            wait,
        }
    }

    /// Schedule the wrapped function with `payload`, superseding any pending
    /// call. With a zero window the function runs inline.
    pub fn call(&self, payload: A) {
        if self.wait.is_zero() {
            (self.inner.call)(payload);
            return;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.pending.lock() = Some(payload);
        trace!(generation, wait_ms = self.wait.as_millis() as u64, "debounce scheduled");

        let inner = Arc::clone(&self.inner);
        let wait = self.wait;
        thread::spawn(move || {
            thread::sleep(wait);
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            let payload = inner.pending.lock().take();
            if let Some(payload) = payload {
                (inner.call)(payload);
            }
        });
    }

    /// Discard the pending call, if any. Later calls schedule normally.
    pub fn cancel(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.pending.lock().take();
        trace!("debounce cancelled");
    }
}

impl<A: Send + 'static> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            wait: self.wait,
        }
    }
}
