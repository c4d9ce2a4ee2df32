//! Binder Core
//!
//! The shared bind-once-then-resubscribe pattern every one-way binder is a
//! policy over.
//!
//! # How it works
//!
//! 1. The setter runs immediately, so there is no unbound visible state.
//! 2. The source is subscribed with the configured debounce window; every
//!    notification re-runs the setter with the source's current value.
//! 3. With `autodisconnect`, a notification arriving after the target left
//!    the document tears the subscription down instead of writing. Detection
//!    is lazy; nothing polls, and an orphaned binding dies on its next
//!    notification.
//!
//! The core itself never touches the DOM; the single DOM write per
//! notification belongs to the setter. Setter panics propagate to the
//! notification dispatcher unchanged.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::dom::{Element, Node, TextNode};
use crate::options::BindOptions;
use crate::reactive::{Change, Source, Unsubscriber};

/// A node a binder can keep synchronized. The core only needs cloning and
/// connectivity.
pub(crate) trait BindTarget: Clone + Send + Sync + 'static {
    fn is_connected(&self) -> bool;
}

impl BindTarget for Element {
    fn is_connected(&self) -> bool {
        Element::is_connected(self)
    }
}

impl BindTarget for TextNode {
    fn is_connected(&self) -> bool {
        TextNode::is_connected(self)
    }
}

impl BindTarget for Node {
    fn is_connected(&self) -> bool {
        Node::is_connected(self)
    }
}

/// Bind `source` to `target` through `setter`: run it once now, then on
/// every notification until unsubscribed.
pub(crate) fn attach<T, S, N, F>(
    source: &S,
    target: &N,
    setter: F,
    options: &BindOptions,
) -> Unsubscriber
where
    T: Clone + Send + Sync + 'static,
    S: Source<T> + Clone + 'static,
    N: BindTarget,
    F: Fn(&S, &N, &BindOptions) + Send + Sync + 'static,
{
    setter(source, target, options);

    let subscribed_source = source.clone();
    let subscribed_target = target.clone();
    let subscribed_options = options.clone();

    // The subscription's own unsubscriber, visible from inside the listener
    // for the autodisconnect path.
    let handle: Arc<OnceLock<Unsubscriber>> = Arc::new(OnceLock::new());
    let listener_handle = Arc::clone(&handle);

    let unsubscriber = source.subscribe(
        Arc::new(move |_change: &Change<T>| {
            if subscribed_options.autodisconnect && !subscribed_target.is_connected() {
                debug!("autodisconnect: target left the document, unsubscribing");
                if let Some(unsubscriber) = listener_handle.get() {
                    unsubscriber.unsubscribe();
                }
                return;
            }
            setter(&subscribed_source, &subscribed_target, &subscribed_options);
        }),
        options.debounce_time,
    );

    let _ = handle.set(unsubscriber.clone());
    unsubscriber
}
