//! Cooperative cancellation token handed to provider calls by the host

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// Identifier returned by [`Cancellable::connect`]
pub type HandlerId = u64;

type Handler = Box<dyn FnOnce() + Send>;

/// Shared cancellation flag with "on cancel" handlers.
///
/// Clones share the same state. Handlers run at most once, on the thread
/// that calls [`Cancellable::cancel`]. Connecting to a token that is already
/// cancelled runs the handler immediately and returns 0.
#[derive(Clone, Default)]
pub struct Cancellable {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    token: CancellationToken,
    handlers: Mutex<HashMap<HandlerId, Handler>>,
    next_id: AtomicU64,
}

impl Cancellable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Request cancellation and run every connected handler
    pub fn cancel(&self) {
        let handlers = {
            let mut handlers = self
                .inner
                .handlers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if self.inner.token.is_cancelled() {
                return;
            }
            // Flip the flag under the lock so a concurrent connect either
            // lands in the drained map or sees the cancelled state.
            self.inner.token.cancel();
            std::mem::take(&mut *handlers)
        };

        for (_, handler) in handlers {
            handler();
        }
    }

    /// Register a handler to run on cancellation
    pub fn connect<F>(&self, handler: F) -> HandlerId
    where
        F: FnOnce() + Send + 'static,
    {
        let mut handlers = self
            .inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.inner.token.is_cancelled() {
            drop(handlers);
            handler();
            return 0;
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        handlers.insert(id, Box::new(handler));
        id
    }

    /// Remove a handler; unknown or already fired ids are ignored
    pub fn disconnect(&self, id: HandlerId) {
        if id == 0 {
            return;
        }
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self) -> usize {
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Wait until cancellation is requested
    pub async fn cancelled(&self) {
        self.inner.token.cancelled().await
    }
}

impl fmt::Debug for Cancellable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancellable")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
