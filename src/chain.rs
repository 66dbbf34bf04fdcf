use std::sync::{Arc, RwLock};

use crate::SharedHandler;

/// `HandlerChain` stores the ordered handler list and allows concurrent readers while mutation
/// replaces the list wholesale, so an in-flight check iterates a consistent snapshot that is not
/// affected by later `push`/`remove`/`clear` calls.
pub(crate) struct HandlerChain {
    handlers: RwLock<Arc<Vec<SharedHandler>>>,
}

impl HandlerChain {
    pub(crate) fn new() -> Self {
        Self {
            handlers: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Get the current handler list. The snapshot stays valid across concurrent mutation.
    pub(crate) fn snapshot(&self) -> Arc<Vec<SharedHandler>> {
        // self.handlers.read() should always return Ok(). Err() is possible only if the lock is
        // poisoned (writer panicked while holding the lock), which should never happen. Still,
        // returning an empty chain here to not crash the app.
        match self.handlers.read() {
            Ok(handlers) => handlers.clone(),
            Err(_) => Arc::new(Vec::new()),
        }
    }

    /// Append a handler to the end of the chain (lowest precedence).
    pub(crate) fn push(&self, handler: SharedHandler) {
        if let Ok(mut slot) = self.handlers.write() {
            let mut next = (**slot).clone();
            next.push(handler);
            *slot = Arc::new(next);
        }
    }

    /// Remove the first occurrence of `handler`, matched by identity. Absent handlers are
    /// ignored.
    pub(crate) fn remove(&self, handler: &SharedHandler) {
        if let Ok(mut slot) = self.handlers.write() {
            if let Some(index) = slot.iter().position(|h| Arc::ptr_eq(h, handler)) {
                let mut next = (**slot).clone();
                next.remove(index);
                *slot = Arc::new(next);
            }
        }
    }

    /// Empty the chain.
    pub(crate) fn clear(&self) {
        if let Ok(mut slot) = self.handlers.write() {
            *slot = Arc::new(Vec::new());
        }
    }
}
