//! # conduit
//!
//! Channel pipelines, fan-in merge and a concurrent ledger — thread-backed,
//! embeddable.
//!
//! conduit owns the stage threads, the channels between them, the
//! cancellation signal and the error type. Stages are connected by
//! rendezvous channels by default, so a producer only runs ahead of its
//! consumer by a single handoff.
//!
//! # Quick Start
//!
//! ```rust
//! let pipe = conduit::pipeline().name("squares").build();
//!
//! let squares: Vec<i64> = pipe
//!     .square(pipe.generate(vec![1, 2, 3]).unwrap())
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(squares, vec![1, 4, 9]);
//! ```
//!
//! # Fan-in
//!
//! [`Pipeline::merge`] drains any number of streams concurrently. The merged
//! stream closes only once every source is exhausted:
//!
//! ```rust
//! let pipe = conduit::pipeline().build();
//!
//! let a = pipe.square(pipe.generate(vec![1, 2]).unwrap()).unwrap();
//! let b = pipe.square(pipe.generate(vec![3, 4]).unwrap()).unwrap();
//!
//! let mut all: Vec<i64> = pipe.merge(vec![a, b]).unwrap().collect();
//! all.sort();
//! assert_eq!(all, vec![1, 4, 9, 16]);
//! ```
//!
//! # Ledger
//!
//! [`Ledger`] guards its balances with one reader/writer lock;
//! [`LedgerActor`] serves the same operations from a dedicated thread. Both
//! implement [`Accounts`].
//!
//! ```rust
//! use conduit::{Accounts, Ledger};
//!
//! fn pay(accounts: &dyn Accounts) -> u64 {
//!     accounts.deposit("alice", 5);
//!     accounts.withdraw("alice", 7)
//! }
//!
//! assert_eq!(pay(&Ledger::new()), 5);
//! ```

#![forbid(unsafe_code)]

mod actor;
mod builder;
mod cancel;
mod engine;
mod error;
mod greeting;
mod ledger;
mod results;
mod stream;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use actor::LedgerActor;
pub use builder::{Pipeline, PipelineBuilder};
pub use cancel::CancelToken;
pub use error::ConduitError;
pub use greeting::{greet, Go, Greeter, Php};
pub use ledger::Ledger;
pub use results::{DrainStats, Drained};
pub use stream::Stream;
pub use traits::{Accounts, Square, Transform};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`PipelineBuilder`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// let pipe = conduit::pipeline().capacity(4).build();
/// let call = pipe.deferred(Duration::from_millis(10), "dinner").unwrap();
///
/// assert_eq!(call.first_within(Duration::from_secs(5)).unwrap(), "dinner");
/// ```
pub fn pipeline() -> PipelineBuilder {
    PipelineBuilder::default()
}
