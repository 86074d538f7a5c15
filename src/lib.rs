//! # lazyseq
//!
//! Persistent, lazily evaluated, memoized sequences for Rust.
//!
//! ## Overview
//!
//! A [`LazySeq`](persistent::LazySeq) knows its first element immediately
//! but computes the rest of itself only when traversal demands it. Every
//! computed tail is cached, so the work happens at most once even when the
//! same sequence is shared between threads.
//!
//! - **Control Structures**: [`MemoCell`](control::MemoCell), a write-once,
//!   thread-safe deferred computation
//! - **Persistent Data Structures**: [`LazySeq`](persistent::LazySeq) and its
//!   combinators (map, filter, take, scan, sliding, ...)
//!
//! ## Feature Flags
//!
//! - `control`: Control structures (`MemoCell`)
//! - `persistent`: Persistent lazy sequences (requires `control`)
//! - `serde`: `Serialize`/`Deserialize` for `LazySeq`
//! - `fxhash` / `ahash`: Faster hashers for `distinct`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lazyseq::prelude::*;
//!
//! let fibonacci = LazySeq::iterate((0_u64, 1_u64), |&(a, b)| (b, a + b)).map(|pair| pair.0);
//! assert_eq!(fibonacci.take(8).to_vec(), vec![0, 1, 1, 2, 3, 5, 8, 13]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use lazyseq::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;

    #[cfg(feature = "persistent")]
    pub use crate::lazy_seq;
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "persistent")]
pub mod persistent;
