/// Maps each element of a stream to a new value.
///
/// Implement this for stateless per-element work: squaring, scaling,
/// parsing, tagging a value with a `Result` so failures travel in-band, etc.
/// Closures `Fn(T) -> U` implement it automatically.
///
/// # Thread Safety
///
/// `Send + Sync` are required — the transform is moved into the stage's
/// thread.
///
/// # Example
///
/// ```rust
/// use conduit::Transform;
///
/// struct Double;
///
/// impl Transform<i64, i64> for Double {
///     fn apply(&self, x: i64) -> i64 {
///         x * 2
///     }
/// }
///
/// let pipe = conduit::pipeline().build();
/// let out: Vec<i64> = pipe
///     .transform(pipe.generate(vec![1, 2, 3]).unwrap(), Double)
///     .unwrap()
///     .collect();
/// assert_eq!(out, vec![2, 4, 6]);
/// ```
pub trait Transform<T, U>: Send + Sync {
    fn apply(&self, input: T) -> U;
}

impl<T, U, F> Transform<T, U> for F
where
    F: Fn(T) -> U + Send + Sync,
{
    fn apply(&self, input: T) -> U {
        self(input)
    }
}

/// Squares an integer. Overflow wraps.
pub struct Square;

impl Transform<i64, i64> for Square {
    fn apply(&self, x: i64) -> i64 {
        x.wrapping_mul(x)
    }
}

/// A named-account balance store.
///
/// Implemented by [`Ledger`](crate::Ledger) (lock-guarded) and
/// [`LedgerActor`](crate::LedgerActor) (message-passing), so callers can be
/// written against either.
pub trait Accounts: Send + Sync {
    /// Credit `amount` to `name`, opening the account at 0 if needed.
    fn deposit(&self, name: &str, amount: u64);

    /// Debit up to `amount` from `name` and return what was actually taken.
    /// Unknown accounts yield 0.
    fn withdraw(&self, name: &str, amount: u64) -> u64;

    /// Current balance, or 0 for unknown accounts.
    fn query(&self, name: &str) -> u64;
}
