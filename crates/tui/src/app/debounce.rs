use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

/// Delays an event until no new trigger arrived for `delay`.
///
/// Each trigger aborts the pending timer, so a superseded timer never fires.
#[derive(Debug)]
pub struct Debouncer<E> {
    delay: Duration,
    tx: UnboundedSender<E>,
    pending: Option<JoinHandle<()>>,
}

impl<E: Send + 'static> Debouncer<E> {
    pub fn new(delay: Duration, tx: UnboundedSender<E>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn trigger(&mut self, event: E) {
        self.cancel();
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone only while the app shuts down.
            let _ = tx.send(event);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<E> Drop for Debouncer<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
