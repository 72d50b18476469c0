//! Cancellation signal built on a `tokio::sync::watch` channel.
//!
//! [`cancel_pair`] returns the trigger and the signal.  The signal is
//! cheap to clone; every clone observes the same trigger.  Dropping the
//! trigger without calling `cancel` never cancels.

use tokio::sync::watch;

/// Owner side: flips the signal once.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

/// Observer side, passed into `walk`.
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

/// Create a linked trigger/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelSignal(rx))
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    /// Another signal observing this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal(self.0.subscribe())
    }
}

impl CancelSignal {
    /// A signal that can never fire.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        CancelSignal(rx)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolve once cancellation is requested.  Pends forever if the handle
    /// was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.0.clone();
        if rx.wait_for(|c| *c).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
