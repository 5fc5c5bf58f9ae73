use std::time::Duration;

/// Everything left in a stream, collected by [`Stream::drain`](crate::Stream::drain).
pub struct Drained<T> {
    /// Elements in the order they were received.
    pub values: Vec<T>,

    /// Drain performance statistics.
    pub stats: DrainStats,
}

/// Statistics for a completed drain.
pub struct DrainStats {
    /// Number of elements received.
    pub elements: usize,

    /// Wall-clock time from the first receive attempt until the stream closed.
    pub duration: Duration,

    /// Convenience field — equals `elements / duration.as_secs_f64()`,
    /// clamped to 0 on zero-duration drains.
    pub elements_per_sec: usize,
}

impl DrainStats {
    pub(crate) fn compute(elements: usize, duration: Duration) -> Self {
        let eps = if duration.as_secs_f64() > 0.0 {
            (elements as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            elements,
            duration,
            elements_per_sec: eps,
        }
    }
}
