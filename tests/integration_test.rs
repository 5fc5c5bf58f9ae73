use std::thread;
use std::time::Duration;

use conduit::{pipeline, Accounts, CancelToken, ConduitError, Ledger, LedgerActor, Transform};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Passes values through after a short pause, so a merge sees sources that
/// finish well after the fast ones.
struct Slow(Duration);

impl Transform<i64, i64> for Slow {
    fn apply(&self, x: i64) -> i64 {
        thread::sleep(self.0);
        x
    }
}

fn hammer(accounts: &dyn Accounts, threads: usize, deposits: u64) {
    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..deposits {
                    accounts.deposit("shared", 1);
                }
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn squares_in_order() {
    let pipe = pipeline().build();
    let out: Vec<i64> = pipe
        .square(pipe.generate(vec![3, -2, 0, 7]).unwrap())
        .unwrap()
        .collect();

    assert_eq!(out, vec![9, 4, 0, 49]);
}

#[test]
fn empty_generate_closes_immediately() {
    let pipe = pipeline().build();
    let out: Vec<i64> = pipe.generate(Vec::<i64>::new()).unwrap().collect();
    assert!(out.is_empty());
}

#[test]
fn stages_run_on_named_threads() {
    let pipe = pipeline().name("squares").build();
    let names: Vec<Option<String>> = pipe
        .transform(pipe.generate(vec![1i64]).unwrap(), |_: i64| {
            thread::current().name().map(str::to_owned)
        })
        .unwrap()
        .collect();

    assert_eq!(names, vec![Some("squares-transform".to_string())]);
}

#[test]
fn merge_waits_for_slow_sources() {
    let pipe = pipeline().build();

    let fast = pipe.generate(vec![1, 2, 3]).unwrap();
    let slow = pipe
        .transform(pipe.generate(vec![10, 20, 30]).unwrap(), Slow(Duration::from_millis(30)))
        .unwrap();
    let slower = pipe
        .transform(pipe.generate(vec![100, 200]).unwrap(), Slow(Duration::from_millis(60)))
        .unwrap();

    let mut all: Vec<i64> = pipe.merge(vec![fast, slow, slower]).unwrap().collect();
    all.sort();

    assert_eq!(all, vec![1, 2, 3, 10, 20, 30, 100, 200], "no element may be lost");
}

#[test]
fn merge_keeps_per_source_order() {
    let pipe = pipeline().build();
    let evens = pipe.generate(vec![0i64, 2, 4, 6, 8]).unwrap();
    let odds = pipe.generate(vec![1i64, 3, 5, 7, 9]).unwrap();

    let merged: Vec<i64> = pipe.merge(vec![evens, odds]).unwrap().collect();

    let evens: Vec<_> = merged.iter().filter(|x| *x % 2 == 0).copied().collect();
    let odds: Vec<_> = merged.iter().filter(|x| *x % 2 == 1).copied().collect();
    assert_eq!(evens, vec![0, 2, 4, 6, 8]);
    assert_eq!(odds, vec![1, 3, 5, 7, 9]);
}

#[test]
fn merge_of_nothing_is_empty() {
    let pipe = pipeline().build();
    let out: Vec<i64> = pipe.merge(Vec::new()).unwrap().collect();
    assert!(out.is_empty());
}

#[test]
fn buffered_capacity_behaves_the_same() {
    let pipe = pipeline().capacity(16).build();
    let a = pipe.square(pipe.generate(1..=50).unwrap()).unwrap();
    let b = pipe.square(pipe.generate(51..=100).unwrap()).unwrap();

    let drained = pipe.merge(vec![a, b]).unwrap().drain();

    assert_eq!(drained.stats.elements, 100);
    let expected: i64 = (1..=100i64).map(|x| x * x).sum();
    assert_eq!(drained.values.iter().sum::<i64>(), expected);
}

#[test]
fn cancel_stops_unbounded_pipeline() {
    let pipe = pipeline().build();
    let mut squares = pipe.square(pipe.generate(0i64..).unwrap()).unwrap();

    let head: Vec<i64> = squares.by_ref().take(3).collect();
    assert_eq!(head, vec![0, 1, 4]);

    pipe.cancel();
    assert!(pipe.cancel_token().is_cancelled());

    // At most one handoff can race the signal; after that the stream closes.
    let tail: Vec<i64> = squares.collect();
    assert!(tail.len() <= 1, "got {} elements after cancel", tail.len());
}

#[test]
fn shared_token_cancels_every_pipeline() {
    let token = CancelToken::new();
    let left = pipeline().name("left").cancel_token(token.clone()).build();
    let right = pipeline().name("right").cancel_token(token.clone()).build();

    let a = left.generate(0i64..).unwrap();
    let b = right.generate(0i64..).unwrap();

    token.cancel();

    let a_rest = a.recv_timeout(Duration::from_secs(1));
    assert!(matches!(a_rest, Err(ConduitError::Cancelled)));
    assert!(b.take(10).count() <= 1);
}

#[test]
fn recv_timeout_reports_slow_stage() {
    let pipe = pipeline().build();
    let later = pipe.deferred(Duration::from_secs(5), 1u8).unwrap();

    let err = later.recv_timeout(Duration::from_millis(20)).unwrap_err();
    assert!(matches!(err, ConduitError::Timeout));
    assert!(err.is_recoverable());
    pipe.cancel();
}

#[test]
fn deferred_yields_once_then_closes() {
    let pipe = pipeline().build();
    let mut call = pipe.deferred(Duration::from_millis(10), "mom call you eat").unwrap();

    assert_eq!(call.next(), Some("mom call you eat"));
    assert_eq!(call.next(), None);
}

#[test]
fn recv_timeout_sees_closed_stream() {
    let pipe = pipeline().build();
    let mut one = pipe.generate(vec![5i64]).unwrap();

    assert_eq!(one.next(), Some(5));
    assert!(matches!(one.recv_timeout(Duration::from_secs(1)), Ok(None)));
}

#[test]
fn dropping_stream_stops_producer() {
    let pipe = pipeline().build();
    let first: Vec<i64> = pipe.generate(0i64..).unwrap().take(2).collect();
    assert_eq!(first, vec![0, 1]);
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[test]
fn ledger_deposit_withdraw_query() {
    let ledger = Ledger::new();
    ledger.deposit("A", 5);
    ledger.deposit("A", 3);
    assert_eq!(ledger.query("A"), 8);

    assert_eq!(ledger.withdraw("A", 100), 8);
    assert_eq!(ledger.query("A"), 0);

    assert_eq!(ledger.query("unknown"), 0);
    assert_eq!(ledger.withdraw("unknown", 10), 0);
}

#[test]
fn ledger_has_no_lost_updates() {
    let ledger = Ledger::new();
    hammer(&ledger, 8, 1_000);
    assert_eq!(ledger.query("shared"), 8_000);
}

#[test]
fn actor_has_no_lost_updates() {
    let actor = LedgerActor::spawn().unwrap();
    hammer(&actor, 8, 500);
    assert_eq!(actor.query("shared"), 4_000);
}

#[test]
fn concurrent_withdrawals_never_overdraw() {
    let ledger = Ledger::new();
    ledger.deposit("pot", 1_000);

    let taken: u64 = thread::scope(|s| {
        let handles: Vec<_> = (0..10)
            .map(|_| s.spawn(|| (0..50).map(|_| ledger.withdraw("pot", 3)).sum::<u64>()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(taken, 1_000);
    assert_eq!(ledger.query("pot"), 0);
}

#[test]
fn snapshot_is_sorted() {
    let ledger = Ledger::new();
    ledger.deposit("carol", 3);
    ledger.deposit("alice", 1);
    ledger.deposit("bob", 2);

    assert_eq!(
        ledger.snapshot(),
        vec![
            ("alice".to_string(), 1),
            ("bob".to_string(), 2),
            ("carol".to_string(), 3),
        ]
    );
}
