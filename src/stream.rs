use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError};
use crossbeam::select;

use crate::cancel::CancelToken;
use crate::error::ConduitError;
use crate::results::{Drained, DrainStats};

/// The output end of a pipeline stage.
///
/// A `Stream` is an [`Iterator`]: `next()` blocks until the stage hands over
/// its next element and returns `None` once the stage has closed its output.
/// Dropping a `Stream` early makes the producing stage stop at its next send.
pub struct Stream<T> {
    rx:     Receiver<T>,
    cancel: CancelToken,
}

impl<T> Stream<T> {
    pub(crate) fn new(rx: Receiver<T>, cancel: CancelToken) -> Self {
        Self { rx, cancel }
    }

    /// Receive the next element, giving up after `timeout`.
    ///
    /// Returns `Ok(None)` once the stream is closed.
    ///
    /// # Errors
    ///
    /// [`ConduitError::Timeout`] if nothing arrived in time,
    /// [`ConduitError::Cancelled`] if the pipeline was cancelled while waiting.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<T>, ConduitError> {
        if self.cancel.is_cancelled() {
            return Err(ConduitError::Cancelled);
        }
        select! {
            recv(self.rx) -> msg => Ok(msg.ok()),
            recv(self.cancel.signal()) -> _ => Err(ConduitError::Cancelled),
            default(timeout) => Err(ConduitError::Timeout),
        }
    }

    /// Non-blocking receive. `None` if nothing is ready or the stream is closed.
    pub fn try_next(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Block until the stream closes, collecting everything it yields.
    pub fn drain(self) -> Drained<T> {
        let start = Instant::now();
        let values: Vec<T> = self.rx.iter().collect();
        let stats = DrainStats::compute(values.len(), start.elapsed());
        Drained { values, stats }
    }

    /// Wait at most `timeout` for a single element, the way a caller would
    /// wait on a one-shot stage such as [`Pipeline::deferred`](crate::Pipeline::deferred).
    ///
    /// A stage that closes without producing anything was cancelled or
    /// stopped early, so that case is reported as [`ConduitError::Cancelled`].
    pub fn first_within(self, timeout: Duration) -> Result<T, ConduitError> {
        match self.rx.recv_timeout(timeout) {
            Ok(v) => Ok(v),
            Err(RecvTimeoutError::Timeout) => Err(ConduitError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(ConduitError::Cancelled),
        }
    }

    pub(crate) fn into_receiver(self) -> Receiver<T> {
        self.rx
    }
}

impl<T> Iterator for Stream<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.rx.recv().ok()
    }
}
