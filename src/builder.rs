use std::time::Duration;

use crate::cancel::CancelToken;
use crate::engine::{self, StageConfig};
use crate::error::ConduitError;
use crate::stream::Stream;
use crate::traits::{Square, Transform};

// ---------------------------------------------------------------------------
// PipelineBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a [`Pipeline`].
///
/// Created via [`conduit::pipeline()`](crate::pipeline). Configure with
/// chained builder methods, then call [`build()`](PipelineBuilder::build).
///
/// # Example
///
/// ```rust,ignore
/// let pipe = conduit::pipeline()
///     .name("squares")
///     .capacity(0)
///     .cancel_token(token)
///     .build();
/// ```
pub struct PipelineBuilder {
    name:     String,
    capacity: usize,
    cancel:   Option<CancelToken>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            name:     "conduit".into(),
            capacity: 0,
            cancel:   None,
        }
    }
}

impl PipelineBuilder {
    /// Prefix for the names of stage threads, e.g. `"squares-generate"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Capacity of every stage's output channel.
    ///
    /// The default of 0 gives rendezvous handoff: a stage's send completes
    /// only once the consumer has taken the element.
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Share an existing [`CancelToken`] with this pipeline.
    ///
    /// Without one, the pipeline creates its own; fire it with
    /// [`Pipeline::cancel`].
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            config: StageConfig {
                name:     self.name,
                capacity: self.capacity,
                cancel:   self.cancel.unwrap_or_default(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// A factory for connected stages that share a name, channel capacity and
/// cancellation token.
///
/// Every stage runs on its own thread and owns the sending half of its output
/// channel; the returned [`Stream`] is the receiving half. Stages close their
/// output when their input is exhausted, when the pipeline is cancelled, or
/// when the downstream `Stream` is dropped.
#[derive(Clone)]
pub struct Pipeline {
    config: StageConfig,
}

impl Pipeline {
    /// Emit `values` in order over a fresh stream, then close it.
    ///
    /// # Errors
    ///
    /// [`ConduitError::Spawn`] if the stage thread could not be started.
    pub fn generate<I>(&self, values: I) -> Result<Stream<I::Item>, ConduitError>
    where
        I: IntoIterator,
        I::IntoIter: Send + 'static,
        I::Item: Send + 'static,
    {
        engine::generate(&self.config, values)
    }

    /// Apply `f` to every element of `input`, preserving arrival order.
    pub fn transform<T, U, F>(&self, input: Stream<T>, f: F) -> Result<Stream<U>, ConduitError>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: Transform<T, U> + 'static,
    {
        engine::transform(&self.config, input, f)
    }

    /// Shorthand for `.transform(input, Square)`.
    pub fn square(&self, input: Stream<i64>) -> Result<Stream<i64>, ConduitError> {
        self.transform(input, Square)
    }

    /// Fan `sources` into one stream.
    ///
    /// Elements from a single source keep their relative order; there is no
    /// ordering between sources. The merged stream closes only after every
    /// source has been fully drained.
    pub fn merge<T>(&self, sources: Vec<Stream<T>>) -> Result<Stream<T>, ConduitError>
    where
        T: Send + 'static,
    {
        engine::merge(&self.config, sources)
    }

    /// A stream that yields `value` once after `delay`, then closes.
    pub fn deferred<T>(&self, delay: Duration, value: T) -> Result<Stream<T>, ConduitError>
    where
        T: Send + 'static,
    {
        engine::deferred(&self.config, delay, value)
    }

    /// Stop every stage of this pipeline at its next suspension point.
    pub fn cancel(&self) {
        self.config.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.config.cancel
    }
}
