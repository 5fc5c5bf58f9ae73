use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::select;
use crossbeam::sync::WaitGroup;

use crate::cancel::CancelToken;
use crate::error::ConduitError;
use crate::stream::Stream;
use crate::traits::Transform;

// ---------------------------------------------------------------------------
// StageConfig
// ---------------------------------------------------------------------------

/// Parameters shared by every stage a [`Pipeline`](crate::Pipeline) spawns.
///
/// `pub(crate)` — callers configure these via the builder methods
/// (`.name()`, `.capacity()`, `.cancel_token()`).
#[derive(Clone)]
pub(crate) struct StageConfig {
    pub name:     String,
    pub capacity: usize,
    pub cancel:   CancelToken,
}

impl StageConfig {
    fn stage(&self, kind: &str) -> String {
        format!("{}-{}", self.name, kind)
    }

    fn channel<T>(&self) -> (Sender<T>, Receiver<T>) {
        channel::bounded(self.capacity)
    }
}

// ---------------------------------------------------------------------------
// Suspension points
// ---------------------------------------------------------------------------

/// Hand `value` to the next stage. Returns `false` when the stage should
/// stop: the pipeline was cancelled or the downstream `Stream` was dropped.
fn forward<T>(out: &Sender<T>, value: T, cancel: &CancelToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    select! {
        send(out, value) -> res => res.is_ok(),
        recv(cancel.signal()) -> _ => false,
    }
}

/// Take the next element from upstream, or `None` once upstream closes or
/// the pipeline is cancelled.
fn next_from<T>(input: &Receiver<T>, cancel: &CancelToken) -> Option<T> {
    select! {
        recv(input) -> msg => msg.ok(),
        recv(cancel.signal()) -> _ => None,
    }
}

fn spawn_stage<F>(stage: String, body: F) -> Result<(), ConduitError>
where
    F: FnOnce() + Send + 'static,
{
    let name = stage.clone();
    thread::Builder::new()
        .name(stage.clone())
        .spawn(move || {
            log::trace!("stage '{name}' starting");
            body();
            log::trace!("stage '{name}' exiting");
        })
        .map(|_detached| ())
        .map_err(|source| ConduitError::Spawn { stage, source })
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Emit `values` in order, then close.
pub(crate) fn generate<I>(cfg: &StageConfig, values: I) -> Result<Stream<I::Item>, ConduitError>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    let (tx, rx) = cfg.channel();
    let cancel = cfg.cancel.clone();
    let values = values.into_iter();

    spawn_stage(cfg.stage("generate"), move || {
        for v in values {
            if !forward(&tx, v, &cancel) {
                break;
            }
        }
    })?;

    Ok(Stream::new(rx, cfg.cancel.clone()))
}

/// Apply `f` to every element of `input`, preserving order.
pub(crate) fn transform<T, U, F>(
    cfg: &StageConfig,
    input: Stream<T>,
    f: F,
) -> Result<Stream<U>, ConduitError>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Transform<T, U> + 'static,
{
    let (tx, rx) = cfg.channel();
    let cancel = cfg.cancel.clone();
    let input = input.into_receiver();

    spawn_stage(cfg.stage("transform"), move || {
        while let Some(v) = next_from(&input, &cancel) {
            if !forward(&tx, f.apply(v), &cancel) {
                break;
            }
        }
    })?;

    Ok(Stream::new(rx, cfg.cancel.clone()))
}

/// Drain every source concurrently into one output stream.
///
/// One thread per source forwards its elements; a closer thread waits on a
/// `WaitGroup` covering all of them and only then drops the last sender.
/// Draining threads drop their own sender before their wait-group token,
/// so the output cannot close while any source still has elements in flight.
pub(crate) fn merge<T>(cfg: &StageConfig, sources: Vec<Stream<T>>) -> Result<Stream<T>, ConduitError>
where
    T: Send + 'static,
{
    let (tx, rx) = cfg.channel();
    let wg = WaitGroup::new();
    let count = sources.len();

    for (i, source) in sources.into_iter().enumerate() {
        let tx = tx.clone();
        let wg = wg.clone();
        let cancel = cfg.cancel.clone();
        let input = source.into_receiver();

        spawn_stage(cfg.stage(&format!("merge-{i}")), move || {
            let mut forwarded = 0usize;
            while let Some(v) = next_from(&input, &cancel) {
                if !forward(&tx, v, &cancel) {
                    break;
                }
                forwarded += 1;
            }
            log::trace!("merge source {i} drained after {forwarded} elements");
            drop(tx);
            drop(wg);
        })?;
    }

    spawn_stage(cfg.stage("merge-close"), move || {
        wg.wait();
        log::debug!("merge of {count} sources complete, closing output");
        drop(tx);
    })?;

    Ok(Stream::new(rx, cfg.cancel.clone()))
}

/// Yield `value` once after `delay`, then close.
pub(crate) fn deferred<T>(cfg: &StageConfig, delay: Duration, value: T) -> Result<Stream<T>, ConduitError>
where
    T: Send + 'static,
{
    let (tx, rx) = cfg.channel();
    let cancel = cfg.cancel.clone();

    spawn_stage(cfg.stage("deferred"), move || {
        let timer = channel::after(delay);
        select! {
            recv(timer) -> _ => {
                forward(&tx, value, &cancel);
            }
            recv(cancel.signal()) -> _ => {}
        }
    })?;

    Ok(Stream::new(rx, cfg.cancel.clone()))
}
