#![cfg(feature = "persistent")]
//! Multi-threaded tests for MemoCell and LazySeq.
//!
//! Verifies that deferred computations run at most once no matter how many
//! threads race to force them, and that sequences can be traversed
//! concurrently.

use lazyseq::control::{MemoCell, MemoState};
use lazyseq::persistent::LazySeq;
use rstest::rstest;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

fn counted_naturals(forced: Arc<AtomicUsize>, start: u64) -> LazySeq<u64> {
    LazySeq::lazy_cons(start, move || {
        forced.fetch_add(1, Ordering::SeqCst);
        counted_naturals(forced, start + 1)
    })
}

// =============================================================================
// MemoCell
// =============================================================================

#[rstest]
#[case(2)]
#[case(THREADS)]
#[case(32)]
fn memo_cell_computes_once_under_contention(#[case] thread_count: usize) {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let cell = Arc::new(MemoCell::new(move || {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        thread::sleep(std::time::Duration::from_millis(5));
        String::from("shared")
    }));
    let barrier = Arc::new(Barrier::new(thread_count));

    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cell.force().clone()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "shared");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cell.state(), MemoState::Resolved);
}

#[rstest]
fn memo_cell_poison_is_visible_to_every_thread() {
    let cell: Arc<MemoCell<i32>> = Arc::new(MemoCell::new(|| panic!("computation failed")));
    let first = catch_unwind(AssertUnwindSafe(|| *cell.force()));
    assert!(first.is_err());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cell = Arc::clone(&cell);
            thread::spawn(move || catch_unwind(AssertUnwindSafe(|| *cell.force())).is_err())
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert!(cell.is_poisoned());
}

#[rstest]
fn distinct_cells_do_not_block_each_other() {
    let release = Arc::new(Barrier::new(2));
    let release_clone = Arc::clone(&release);
    let slow = Arc::new(MemoCell::new(move || {
        release_clone.wait();
        1
    }));
    let fast = Arc::new(MemoCell::new(|| 2));

    let slow_clone = Arc::clone(&slow);
    let handle = thread::spawn(move || *slow_clone.force());

    // The slow computation cannot finish before this thread reaches the barrier.
    assert_eq!(*fast.force(), 2);
    release.wait();
    assert_eq!(handle.join().unwrap(), 1);
}

// =============================================================================
// LazySeq
// =============================================================================

#[rstest]
fn concurrent_traversal_forces_each_tail_once() {
    let forced = Arc::new(AtomicUsize::new(0));
    let naturals = counted_naturals(Arc::clone(&forced), 0);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let naturals = naturals.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                naturals.take(1_000).fold(0_u64, |acc, x| acc + x)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 499_500);
    }
    assert_eq!(forced.load(Ordering::SeqCst), 999);
}

#[rstest]
fn concurrent_readers_of_derived_sequence_agree() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let squares = LazySeq::numbers(0).map(move |x| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        x * x
    });

    let handles: Vec<_> = (0..THREADS)
        .map(|offset| {
            let squares = squares.clone();
            thread::spawn(move || squares.drop_first(offset * 10).take(50).to_vec())
        })
        .collect();

    for (offset, handle) in handles.into_iter().enumerate() {
        let start = i64::try_from(offset * 10).unwrap();
        let expected: Vec<i64> = (start..start + 50).map(|x| x * x).collect();
        assert_eq!(handle.join().unwrap(), expected);
    }
    let longest = (THREADS - 1) * 10 + 50;
    assert_eq!(calls.load(Ordering::SeqCst), longest);
}

#[rstest]
fn sequences_move_between_threads() {
    let seq = LazySeq::iterate(1_u64, |x| x * 2);
    let handle = thread::spawn(move || seq.get(10).copied());
    assert_eq!(handle.join().unwrap(), Some(1_024));
}
