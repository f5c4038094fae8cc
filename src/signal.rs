//! One-shot broadcast signaling.

use std::sync::Arc;

use tokio::sync::watch;

/// A one-shot, multi-waiter signal.
///
/// Fires at most once and never reverts. Clones share the same underlying
/// state, so any number of waiters can block on the same firing and all of
/// them unblock together. Used for the process-wide ready signal and for
/// download completion.
#[derive(Debug, Clone)]
pub struct OnceSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl OnceSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal, waking every current and future waiter. Idempotent.
    pub fn fire(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal has fired. Returns immediately if it already
    /// has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives at least as long as `self`, so this cannot fail
        // while we are waiting on it.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for OnceSignal {
    fn default() -> Self {
        Self::new()
    }
}
