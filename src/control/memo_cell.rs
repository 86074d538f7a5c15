//! Thread-safe write-once memoization cell.
//!
//! This module provides [`MemoCell`], the run-once evaluation mechanism that
//! sits inside every lazily computed sequence node. A cell starts out holding
//! a deferred computation and transitions exactly once to holding its result.
//!
//! # Protocol
//!
//! Resolution follows the double-checked locking pattern, scoped to a single
//! cell:
//!
//! 1. Check the resolved slot. If a value is present, return it without locking.
//! 2. Acquire the cell's own lock.
//! 3. Check the slot again; another thread may have resolved it meanwhile.
//! 4. Take the deferred computation, run it, store the result, release the lock.
//!
//! Threads that lose the race block on the cell lock and never run the
//! computation themselves. There is no process-wide lock.
//!
//! # Poisoning
//!
//! If the computation panics, the panic is propagated unchanged to the caller
//! that forced the cell, and the cell becomes **poisoned**: the computation has
//! been consumed, so every later `force()` panics instead of running it again.
//!
//! # Re-entry
//!
//! Forcing a cell from inside its own computation on the same thread cannot
//! complete. The cell lock is re-entrant, so this is detected and reported
//! with a panic instead of deadlocking.
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::control::MemoCell;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cell = Arc::new(MemoCell::new(|| 6 * 7));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let cell = Arc::clone(&cell);
//!         thread::spawn(move || *cell.force())
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), 42);
//! }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::ReentrantMutex;

/// A deferred computation owned by a [`MemoCell`] until it runs.
type Thunk<T> = Box<dyn FnOnce() -> T + Send>;

/// The computation has not run yet.
const STATE_UNRESOLVED: u8 = 0;
/// The computation is running; only its own thread can hold the lock.
const STATE_RESOLVING: u8 = 1;
/// `value` is initialized.
const STATE_RESOLVED: u8 = 2;
/// The computation panicked and has been consumed.
const STATE_POISONED: u8 = 3;

/// Observable lifecycle of a [`MemoCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    /// The computation has not run yet.
    Unresolved,
    /// The computation is running on some thread.
    Resolving,
    /// The value is available.
    Resolved,
    /// The computation panicked; the cell can never be resolved.
    Poisoned,
}

/// A write-once cell that runs its computation at most once.
///
/// `MemoCell<T>` is `Send + Sync` whenever `T: Send + Sync`, so a single cell
/// can be forced concurrently from many threads.
///
/// # Examples
///
/// ```rust
/// use lazyseq::control::MemoCell;
///
/// let cell = MemoCell::new(|| String::from("computed"));
/// assert!(!cell.is_resolved());
/// assert_eq!(cell.force(), "computed");
/// assert!(cell.is_resolved());
/// ```
pub struct MemoCell<T> {
    value: OnceLock<T>,
    // Written only while `pending` is locked; read without locking.
    state: AtomicU8,
    pending: ReentrantMutex<RefCell<Option<Thunk<T>>>>,
}

impl<T> MemoCell<T> {
    /// Creates an unresolved cell that will run `computation` on first force.
    #[inline]
    pub fn new<F>(computation: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            value: OnceLock::new(),
            state: AtomicU8::new(STATE_UNRESOLVED),
            pending: ReentrantMutex::new(RefCell::new(Some(Box::new(computation)))),
        }
    }

    /// Creates a cell that is already resolved to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::control::MemoCell;
    ///
    /// let cell = MemoCell::resolved(7);
    /// assert!(cell.is_resolved());
    /// assert_eq!(*cell.force(), 7);
    /// ```
    #[inline]
    pub fn resolved(value: T) -> Self {
        Self {
            value: OnceLock::from(value),
            state: AtomicU8::new(STATE_RESOLVED),
            pending: ReentrantMutex::new(RefCell::new(None)),
        }
    }

    /// Returns the value, running the computation first if necessary.
    ///
    /// Concurrent callers on an unresolved cell serialize on the cell's lock;
    /// exactly one of them runs the computation and all of them observe its
    /// result.
    ///
    /// # Panics
    ///
    /// - Re-raises the panic of the computation, if it panics.
    /// - Panics if the cell was poisoned by an earlier panicking computation.
    /// - Panics if called re-entrantly from inside the cell's own computation.
    pub fn force(&self) -> &T {
        if let Some(value) = self.value.get() {
            return value;
        }

        let guard = self.pending.lock();
        if let Some(value) = self.value.get() {
            return value;
        }

        match self.state.load(Ordering::Acquire) {
            STATE_RESOLVING => {
                tracing::debug!("memo cell forced re-entrantly from its own computation");
                panic!("MemoCell forced re-entrantly from its own computation");
            }
            STATE_POISONED => {
                panic!("MemoCell has been poisoned by a panicking computation");
            }
            _ => {}
        }

        let Some(computation) = guard.borrow_mut().take() else {
            unreachable!("unresolved cell without a computation");
        };
        self.state.store(STATE_RESOLVING, Ordering::Release);

        match catch_unwind(AssertUnwindSafe(computation)) {
            Ok(value) => {
                let value = self.value.get_or_init(move || value);
                self.state.store(STATE_RESOLVED, Ordering::Release);
                tracing::trace!("memo cell resolved");
                value
            }
            Err(payload) => {
                self.state.store(STATE_POISONED, Ordering::Release);
                drop(guard);
                tracing::debug!("memo cell poisoned by a panicking computation");
                resume_unwind(payload)
            }
        }
    }

    /// Returns the value if the cell is resolved, without forcing it.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns `true` once the computation has produced its value.
    ///
    /// Never triggers evaluation and never blocks.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns `true` if the computation panicked.
    ///
    /// Never blocks.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.state() == MemoState::Poisoned
    }

    /// Reports the current lifecycle state without forcing or locking.
    pub fn state(&self) -> MemoState {
        match self.state.load(Ordering::Acquire) {
            STATE_UNRESOLVED => MemoState::Unresolved,
            STATE_RESOLVING => MemoState::Resolving,
            STATE_POISONED => MemoState::Poisoned,
            _ => MemoState::Resolved,
        }
    }

    /// Consumes the cell, returning the value if it was resolved.
    ///
    /// An unresolved computation is dropped without running.
    #[inline]
    pub fn into_inner(self) -> Option<T> {
        self.value.into_inner()
    }
}

impl<T: fmt::Debug> fmt::Debug for MemoCell<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => formatter.debug_tuple("MemoCell").field(value).finish(),
            None => formatter
                .debug_tuple("MemoCell")
                .field(&self.state())
                .finish(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for MemoCell<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            MemoState::Resolved => match self.get() {
                Some(value) => fmt::Display::fmt(value, formatter),
                None => formatter.write_str("<unresolved>"),
            },
            MemoState::Unresolved | MemoState::Resolving => formatter.write_str("<unresolved>"),
            MemoState::Poisoned => formatter.write_str("<poisoned>"),
        }
    }
}
