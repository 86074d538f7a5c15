//! Construction helpers for [`LazySeq`].
//!
//! Finite sources produce eagerly linked sequences. Generators (`iterate`,
//! `tabulate`, `continually`, `cycle`, `numbers`) produce infinite sequences
//! in which every successor is computed on demand.

use std::ops::Add;
use std::sync::Arc;

use super::LazySeq;

impl<T> LazySeq<T> {
    /// Builds a fully materialized sequence from a finite source.
    ///
    /// The source is drained up front. Elements are linked from the back,
    /// popping from a `Vec`, so no reversal is needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::of([1, 2, 3]);
    /// assert_eq!(format!("{seq}"), "[1, 2, 3]");
    /// ```
    #[must_use]
    pub fn of<I: IntoIterator<Item = T>>(elements: I) -> Self {
        Self::concat(elements, Self::empty())
    }

    /// Creates a single-element sequence.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::cons(element, Self::empty())
    }

    /// Links a finite prefix in front of an already known tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let tail = LazySeq::of([3, 4]);
    /// let seq = LazySeq::concat([1, 2], tail.clone());
    /// assert_eq!(seq.to_vec(), vec![1, 2, 3, 4]);
    /// assert!(seq.drop_first(2).ptr_eq(&tail));
    /// ```
    #[must_use]
    pub fn concat<I: IntoIterator<Item = T>>(prefix: I, tail: Self) -> Self {
        let mut elements: Vec<T> = prefix.into_iter().collect();
        let mut result = tail;
        while let Some(element) = elements.pop() {
            result = Self::cons(element, result);
        }
        result
    }

    /// Links a finite prefix in front of a tail computed on demand.
    ///
    /// The last prefix element carries the deferred tail. With an empty
    /// prefix there is nothing to defer it behind, so `tail` runs
    /// immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::concat_lazy([1, 2], || LazySeq::of([3]));
    /// assert_eq!(format!("{seq}"), "[1, 2, ?]");
    /// assert_eq!(seq.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn concat_lazy<I, F>(prefix: I, tail: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnOnce() -> Self + Send + 'static,
    {
        let mut elements: Vec<T> = prefix.into_iter().collect();
        let Some(last) = elements.pop() else {
            return tail();
        };
        Self::concat(elements, Self::lazy_cons(last, tail))
    }

    /// Wraps an iterator so its elements are pulled only as the sequence is
    /// forced.
    ///
    /// The first element is pulled immediately, since every non-empty node
    /// knows its head. Suited to unbounded or expensive sources such as
    /// paged lookups.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::from_iter_lazy(1..);
    /// assert_eq!(seq.take(3).to_vec(), vec![1, 2, 3]);
    /// assert_eq!(format!("{seq}"), "[1, 2, 3, ?]");
    /// ```
    #[must_use]
    pub fn from_iter_lazy<I>(mut iterator: I) -> Self
    where
        I: Iterator<Item = T> + Send + 'static,
    {
        match iterator.next() {
            Some(head) => Self::lazy_cons(head, move || Self::from_iter_lazy(iterator)),
            None => Self::empty(),
        }
    }

    /// Infinite sequence `f(start), f(start + 1), ...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let squares = LazySeq::tabulate(0, |index| index * index);
    /// assert_eq!(squares.take(4).to_vec(), vec![0, 1, 4, 9]);
    /// ```
    #[must_use]
    pub fn tabulate<F>(start: usize, generator: F) -> Self
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        Self::tabulate_shared(start, Arc::new(generator))
    }

    fn tabulate_shared<F>(index: usize, generator: Arc<F>) -> Self
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        let head = generator(index);
        Self::lazy_cons(head, move || Self::tabulate_shared(index + 1, generator))
    }

    /// Infinite sequence of values produced by repeatedly calling `supplier`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    ///
    /// let next_id = AtomicU32::new(100);
    /// let ids = LazySeq::continually(move || next_id.fetch_add(1, Ordering::SeqCst));
    /// assert_eq!(ids.take(3).to_vec(), vec![100, 101, 102]);
    /// ```
    #[must_use]
    pub fn continually<F>(supplier: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::continually_shared(Arc::new(supplier))
    }

    fn continually_shared<F>(supplier: Arc<F>) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let head = supplier();
        Self::lazy_cons(head, move || Self::continually_shared(supplier))
    }
}

impl<T: Clone + Send + Sync + 'static> LazySeq<T> {
    /// Infinite sequence `seed, f(seed), f(f(seed)), ...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let powers = LazySeq::iterate(1, |x| x * 2);
    /// assert_eq!(powers.take(5).to_vec(), vec![1, 2, 4, 8, 16]);
    /// ```
    #[must_use]
    pub fn iterate<F>(seed: T, function: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Self::iterate_shared(seed, Arc::new(function))
    }

    fn iterate_shared<F>(seed: T, function: Arc<F>) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        let previous = seed.clone();
        Self::lazy_cons(seed, move || {
            let next = function(&previous);
            Self::iterate_shared(next, function)
        })
    }

    /// Infinite repetition of a single value.
    #[must_use]
    pub fn repeat(value: T) -> Self {
        let next = value.clone();
        Self::lazy_cons(value, move || Self::repeat(next))
    }

    /// Infinite repetition of a finite collection's elements, in order.
    ///
    /// An empty collection yields an empty sequence rather than an infinite
    /// one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let colors = LazySeq::cycle(["red", "green"]);
    /// assert_eq!(colors.take(5).to_vec(), vec!["red", "green", "red", "green", "red"]);
    ///
    /// let nothing: LazySeq<i32> = LazySeq::cycle([]);
    /// assert!(nothing.is_empty());
    /// ```
    #[must_use]
    pub fn cycle<I: IntoIterator<Item = T>>(elements: I) -> Self {
        let elements: Arc<[T]> = elements.into_iter().collect();
        Self::cycle_from(elements, 0)
    }

    fn cycle_from(elements: Arc<[T]>, index: usize) -> Self {
        let Some(head) = elements.get(index).cloned() else {
            return Self::empty();
        };
        let next = (index + 1) % elements.len();
        Self::lazy_cons(head, move || Self::cycle_from(elements, next))
    }
}

impl<N> LazySeq<N>
where
    N: Add<Output = N> + Copy + Send + Sync + 'static,
{
    /// Infinite arithmetic progression `start, start + step, ...`.
    ///
    /// # Panics
    ///
    /// Forcing a tail panics if `N`'s addition does, e.g. on integer overflow
    /// in debug builds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let odds = LazySeq::numbers_by(1, 2);
    /// assert_eq!(odds.take(4).to_vec(), vec![1, 3, 5, 7]);
    ///
    /// let halves = LazySeq::numbers_by(0.0, 0.5);
    /// assert_eq!(halves.take(3).to_vec(), vec![0.0, 0.5, 1.0]);
    /// ```
    #[must_use]
    pub fn numbers_by(start: N, step: N) -> Self {
        Self::lazy_cons(start, move || Self::numbers_by(start + step, step))
    }
}

impl LazySeq<i64> {
    /// Infinite sequence of consecutive integers starting at `start`.
    ///
    /// Wraps around to `i64::MIN` after `i64::MAX`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// assert_eq!(LazySeq::numbers(5).take(3).to_vec(), vec![5, 6, 7]);
    /// assert_eq!(LazySeq::numbers(i64::MAX).take(2).to_vec(), vec![i64::MAX, i64::MIN]);
    /// ```
    #[must_use]
    pub fn numbers(start: i64) -> Self {
        Self::lazy_cons(start, move || Self::numbers(start.wrapping_add(1)))
    }
}

/// Creates a [`LazySeq`] containing the arguments, like `vec!`.
///
/// # Examples
///
/// ```rust
/// use lazyseq::lazy_seq;
/// use lazyseq::persistent::LazySeq;
///
/// let seq = lazy_seq![1, 2, 3];
/// assert_eq!(seq, LazySeq::of([1, 2, 3]));
///
/// let empty: LazySeq<i32> = lazy_seq![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! lazy_seq {
    () => {
        $crate::persistent::LazySeq::empty()
    };
    ($($element:expr),+ $(,)?) => {
        $crate::persistent::LazySeq::of([$($element),+])
    };
}
