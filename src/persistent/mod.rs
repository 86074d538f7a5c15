//! Persistent (immutable) lazy sequences.
//!
//! This module provides [`LazySeq`], a singly-linked sequence whose tails are
//! computed on demand and memoized. Like every persistent structure, a
//! `LazySeq` is never modified in place: combinators return new sequences
//! that share nodes with their input.
//!
//! # Structural Sharing
//!
//! Prepending an element, or dropping leading elements, reuses the existing
//! nodes instead of copying them. Memoized tails are shared too, so forcing
//! a tail through one handle makes it available through every other handle.
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::persistent::LazySeq;
//!
//! let seq = LazySeq::of([2, 3]);
//! let extended = seq.prepend(1);
//! assert_eq!(seq.len(), 2);      // Original unchanged
//! assert_eq!(extended.len(), 3); // New version
//! assert!(extended.tail().unwrap().ptr_eq(&seq));
//! ```
//!
//! ## Infinite Sequences
//!
//! ```rust
//! use lazyseq::persistent::LazySeq;
//!
//! let primes = LazySeq::numbers(2).filter(|n| (2..*n).all(|d| n % d != 0));
//! assert_eq!(primes.take(5).to_vec(), vec![2, 3, 5, 7, 11]);
//! ```

mod lazy_seq;

pub use lazy_seq::{IntoIter, Iter, LazySeq, LazySeqError};
