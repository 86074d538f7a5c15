//! Control structures for lazy evaluation.
//!
//! This module provides the evaluation machinery shared by the lazy data
//! structures in [`persistent`](crate::persistent):
//!
//! - [`MemoCell`]: A thread-safe write-once cell that runs a deferred
//!   computation at most once and caches its result
//! - [`MemoState`]: The observable lifecycle of a [`MemoCell`]
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::control::MemoCell;
//!
//! let cell = MemoCell::new(|| {
//!     println!("Computing...");
//!     42
//! });
//! // "Computing..." is not printed yet
//!
//! let value = cell.force();
//! // Now "Computing..." is printed and value is 42
//! assert_eq!(*value, 42);
//! ```

mod memo_cell;

pub use memo_cell::{MemoCell, MemoState};
