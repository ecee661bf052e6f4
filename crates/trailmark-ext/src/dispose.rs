//! Explicit resource release
//!
//! [`Dispose`] consumes a handle and releases what it owns.
//! [`dispose_and_clear`] tears down an accumulated list in order and leaves
//! it empty, ready to collect the next generation of handles.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A resource released by consuming its handle
pub trait Dispose {
    fn dispose(self);
}

/// Disposes every element in sequence order, then empties the list.
pub fn dispose_and_clear<D: Dispose>(items: &mut Vec<D>) {
    for item in items.drain(..) {
        item.dispose();
    }
}

impl Dispose for CancellationToken {
    fn dispose(self) {
        self.cancel();
    }
}

impl<T> Dispose for JoinHandle<T> {
    fn dispose(self) {
        self.abort();
    }
}

impl<D: Dispose> Dispose for Option<D> {
    fn dispose(self) {
        if let Some(inner) = self {
            inner.dispose();
        }
    }
}

/// Runs a release action when disposed
///
/// Dropping a `Subscription` without disposing it does not run the action.
pub struct Subscription {
    release: Box<dyn FnOnce() + Send>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Box::new(release),
        }
    }

    /// A subscription whose release does nothing.
    pub fn empty() -> Self {
        Self::new(|| {})
    }
}

impl Dispose for Subscription {
    fn dispose(self) {
        (self.release)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
