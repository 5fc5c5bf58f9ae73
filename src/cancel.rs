use std::sync::Arc;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;

/// A one-shot cancellation signal shared by every stage of a pipeline.
///
/// Cancelling drops the only sender of an internal channel, so every stage
/// blocked in a `select!` on [`signal`](CancelToken::signal) wakes up at once.
/// Nothing is ever sent on that channel.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

struct Inner {
    trigger: Mutex<Option<Sender<()>>>,
    signal:  Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (trigger, signal) = channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Fire the token. Idempotent.
    pub fn cancel(&self) {
        if self.inner.trigger.lock().take().is_some() {
            log::debug!("cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.inner.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Receiver that becomes ready (disconnected) once the token fires.
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}
