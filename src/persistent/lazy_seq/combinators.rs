//! Lazy combinators over [`LazySeq`].
//!
//! Every combinator here is defined by structural recursion over the node
//! representation: it computes the head of its result (if any) and wraps
//! the rest of the work in a new lazily computed tail. None of them forces
//! any part of its input beyond what is needed to produce the element
//! currently demanded.
//!
//! The few that must skip elements to find a head (`filter`, `flat_map`,
//! `drop_while`, `distinct`) skip in a loop rather than by recursion, so a
//! long run of rejected elements does not grow the stack.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{LazySeq, LazySeqError};

#[cfg(feature = "fxhash")]
type SeenSet<T> = rustc_hash::FxHashSet<T>;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
type SeenSet<T> = ahash::AHashSet<T>;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
type SeenSet<T> = std::collections::HashSet<T>;

impl<T> LazySeq<T> {
    /// Skips the first `count` elements.
    ///
    /// Forces exactly `count` tails. The result shares its nodes with this
    /// sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::of([1, 2, 3, 4]);
    /// assert_eq!(seq.drop_first(2).to_vec(), vec![3, 4]);
    /// assert!(seq.drop_first(10).is_empty());
    /// ```
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        let mut current = self;
        for _ in 0..count {
            if current.is_empty() {
                break;
            }
            current = current.rest();
        }
        current.clone()
    }
}

impl<T> LazySeq<T>
where
    T: Send + Sync + 'static,
{
    /// Applies `function` to every element, lazily.
    ///
    /// The head of the result is computed immediately; each further element
    /// is computed when its node is first reached.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::of([1, 2, 3]).map(|x| x * 10);
    /// assert_eq!(seq.to_vec(), vec![10, 20, 30]);
    /// ```
    #[must_use]
    pub fn map<R, F>(&self, function: F) -> LazySeq<R>
    where
        R: Send + Sync + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        map_shared(self, Arc::new(function))
    }

    /// Combines elements pairwise; the result is as long as the shorter input.
    ///
    /// Once the end of either input is already evaluated, the other input is
    /// not forced any further.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let names = LazySeq::of(["a", "b", "c"]);
    /// let labels = names.zip_with(&LazySeq::numbers(1), |name, n| format!("{name}{n}"));
    /// assert_eq!(labels.to_vec(), vec!["a1", "b2", "c3"]);
    /// ```
    #[must_use]
    pub fn zip_with<U, R, F>(&self, other: &LazySeq<U>, function: F) -> LazySeq<R>
    where
        U: Send + Sync + 'static,
        R: Send + Sync + 'static,
        F: Fn(&T, &U) -> R + Send + Sync + 'static,
    {
        zip_shared(self, other, Arc::new(function))
    }

    /// Lazily concatenates `other` after this sequence.
    ///
    /// `other` is not touched until this sequence is exhausted.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        let Some(head) = self.head_option() else {
            return other.clone();
        };
        let source = self.clone();
        let other = other.clone();
        Self::lazy_cons(head.clone(), move || source.rest().append(&other))
    }
}

impl<T> LazySeq<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Keeps the elements satisfying `predicate`.
    ///
    /// Skips non-matching elements eagerly, produces matching elements
    /// lazily: building the result forces the input up to its first match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let evens = LazySeq::numbers(1).filter(|n| n % 2 == 0);
    /// assert_eq!(evens.take(3).to_vec(), vec![2, 4, 6]);
    /// ```
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        filter_shared(self, Arc::new(predicate))
    }

    /// Replaces every element with the elements of a finite collection.
    ///
    /// Each expansion is materialized as soon as its source element is
    /// reached. Empty expansions are skipped, so an infinite input stays
    /// productive as long as some expansions are non-empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::of([1usize, 2, 3]).flat_map(|&n| vec![n; n]);
    /// assert_eq!(seq.to_vec(), vec![1, 2, 2, 3, 3, 3]);
    /// ```
    #[must_use]
    pub fn flat_map<R, I, F>(&self, function: F) -> LazySeq<R>
    where
        R: Send + Sync + 'static,
        I: IntoIterator<Item = R>,
        F: Fn(&T) -> I + Send + Sync + 'static,
    {
        flat_map_shared(self, Arc::new(function))
    }

    /// Returns at most the first `count` elements.
    ///
    /// Never forces the input past element `count`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::numbers(0).take(3);
    /// assert_eq!(seq.to_vec(), vec![0, 1, 2]);
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        if count == 0 {
            return Self::empty();
        }
        let Some(head) = self.head_option() else {
            return Self::empty();
        };
        let source = self.clone();
        Self::lazy_cons(head.clone(), move || {
            if count == 1 {
                Self::empty()
            } else {
                source.rest().take(count - 1)
            }
        })
    }

    /// Alias of [`take`](Self::take).
    #[inline]
    #[must_use]
    pub fn limit(&self, count: usize) -> Self {
        self.take(count)
    }

    /// Returns the elements from `start` (inclusive) to `end` (exclusive).
    ///
    /// # Errors
    ///
    /// Returns [`LazySeqError::InvalidArgument`] if `start > end`. The check
    /// happens before anything is forced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::numbers(0).slice(2, 5).unwrap();
    /// assert_eq!(seq.to_vec(), vec![2, 3, 4]);
    /// assert!(LazySeq::numbers(0).slice(5, 2).is_err());
    /// ```
    pub fn slice(&self, start: usize, end: usize) -> Result<Self, LazySeqError> {
        if start > end {
            return Err(LazySeqError::invalid_argument(
                "slice",
                format!("start {start} is greater than end {end}"),
            ));
        }
        Ok(self.drop_first(start).take(end - start))
    }

    /// Returns the longest prefix whose elements satisfy `predicate`.
    ///
    /// Stops at the first failing element without forcing anything after it.
    #[must_use]
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        take_while_shared(self, Arc::new(predicate))
    }

    /// Skips the longest prefix whose elements satisfy `predicate`.
    ///
    /// Skipping is eager; the returned suffix is shared with this sequence
    /// and left unevaluated beyond its first element.
    #[must_use]
    pub fn drop_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        let mut current = self;
        while let Some(head) = current.head_option() {
            if !predicate(head) {
                break;
            }
            current = current.rest();
        }
        current.clone()
    }

    /// Pairs up elements; the result is as long as the shorter input.
    #[must_use]
    pub fn zip<U>(&self, other: &LazySeq<U>) -> LazySeq<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        self.zip_with(other, |left, right| (left.clone(), right.clone()))
    }

    /// Running accumulation, starting with `initial`.
    ///
    /// The result has one more element than the input and always starts
    /// with `initial`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let sums = LazySeq::of([1, 2, 3, 4]).scan(0, |acc, x| acc + x);
    /// assert_eq!(sums.to_vec(), vec![0, 1, 3, 6, 10]);
    /// ```
    #[must_use]
    pub fn scan<A, F>(&self, initial: A, function: F) -> LazySeq<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(&A, &T) -> A + Send + Sync + 'static,
    {
        scan_shared(self, initial, Arc::new(function))
    }

    /// Sliding windows of `size` elements, advancing one element at a time.
    ///
    /// Only full windows are produced, with one exception: a non-empty input
    /// shorter than `size` yields a single window holding all of it.
    ///
    /// # Errors
    ///
    /// Returns [`LazySeqError::InvalidArgument`] if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let windows = LazySeq::of([5, 7, 9, 11]).sliding(3).unwrap();
    /// assert_eq!(windows.to_vec(), vec![vec![5, 7, 9], vec![7, 9, 11]]);
    ///
    /// let short = LazySeq::of([5, 7]).sliding(3).unwrap();
    /// assert_eq!(short.to_vec(), vec![vec![5, 7]]);
    /// ```
    pub fn sliding(&self, size: usize) -> Result<LazySeq<Vec<T>>, LazySeqError> {
        if size == 0 {
            return Err(LazySeqError::invalid_argument(
                "sliding",
                "window size must be positive",
            ));
        }
        Ok(sliding_windows(self, size, true))
    }

    /// Consecutive groups of `size` elements; the last group may be shorter.
    ///
    /// # Errors
    ///
    /// Returns [`LazySeqError::InvalidArgument`] if `size` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let groups = LazySeq::of([5, 7, 9, 11]).grouped(3).unwrap();
    /// assert_eq!(groups.to_vec(), vec![vec![5, 7, 9], vec![11]]);
    /// ```
    pub fn grouped(&self, size: usize) -> Result<LazySeq<Vec<T>>, LazySeqError> {
        if size == 0 {
            return Err(LazySeqError::invalid_argument(
                "grouped",
                "group size must be positive",
            ));
        }
        Ok(grouped_windows(self, size))
    }

    /// Removes repeated elements, keeping first occurrences in order.
    ///
    /// The set of already emitted elements is private to the returned
    /// sequence and grows as the result is forced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::of([1, 2, 2, 3, 1]).distinct();
    /// assert_eq!(seq.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn distinct(&self) -> Self
    where
        T: Eq + Hash,
    {
        distinct_shared(self, Arc::new(Mutex::new(SeenSet::default())))
    }

    /// Returns the first `count` elements as a `Vec`, forcing exactly those.
    pub(crate) fn take_vec(&self, count: usize) -> Vec<T> {
        self.iter().take(count).cloned().collect()
    }
}

// =============================================================================
// Recursive Builders
// =============================================================================

fn map_shared<T, R, F>(seq: &LazySeq<T>, function: Arc<F>) -> LazySeq<R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(&T) -> R + Send + Sync + 'static,
{
    let Some(head) = seq.head_option() else {
        return LazySeq::empty();
    };
    let mapped = function(head);
    let source = seq.clone();
    LazySeq::lazy_cons(mapped, move || map_shared(source.rest(), function))
}

fn zip_shared<T, U, R, F>(left: &LazySeq<T>, right: &LazySeq<U>, function: Arc<F>) -> LazySeq<R>
where
    T: Send + Sync + 'static,
    U: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(&T, &U) -> R + Send + Sync + 'static,
{
    let (Some(left_head), Some(right_head)) = (left.head_option(), right.head_option()) else {
        return LazySeq::empty();
    };
    let zipped = function(left_head, right_head);
    let left = left.clone();
    let right = right.clone();
    LazySeq::lazy_cons(zipped, move || {
        // Stop without forcing the other side once one side's end is known.
        if left.resolved_rest().is_some_and(|rest| rest.is_empty())
            || right.resolved_rest().is_some_and(|rest| rest.is_empty())
        {
            return LazySeq::empty();
        }
        zip_shared(left.rest(), right.rest(), function)
    })
}

fn filter_shared<T, P>(seq: &LazySeq<T>, predicate: Arc<P>) -> LazySeq<T>
where
    T: Clone + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let mut current = seq;
    while let Some(head) = current.head_option() {
        if predicate(head) {
            let source = current.clone();
            return LazySeq::lazy_cons(head.clone(), move || {
                filter_shared(source.rest(), predicate)
            });
        }
        current = current.rest();
    }
    LazySeq::empty()
}

fn flat_map_shared<T, R, I, F>(seq: &LazySeq<T>, function: Arc<F>) -> LazySeq<R>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    I: IntoIterator<Item = R>,
    F: Fn(&T) -> I + Send + Sync + 'static,
{
    let mut current = seq;
    while let Some(head) = current.head_option() {
        let expansion: Vec<R> = function(head).into_iter().collect();
        if !expansion.is_empty() {
            let source = current.clone();
            return LazySeq::concat_lazy(expansion, move || {
                flat_map_shared(source.rest(), function)
            });
        }
        current = current.rest();
    }
    LazySeq::empty()
}

fn take_while_shared<T, P>(seq: &LazySeq<T>, predicate: Arc<P>) -> LazySeq<T>
where
    T: Clone + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    match seq.head_option() {
        Some(head) if predicate(head) => {
            let source = seq.clone();
            LazySeq::lazy_cons(head.clone(), move || {
                take_while_shared(source.rest(), predicate)
            })
        }
        _ => LazySeq::empty(),
    }
}

fn scan_shared<T, A, F>(seq: &LazySeq<T>, accumulator: A, function: Arc<F>) -> LazySeq<A>
where
    T: Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(&A, &T) -> A + Send + Sync + 'static,
{
    if seq.is_empty() {
        return LazySeq::singleton(accumulator);
    }
    let previous = accumulator.clone();
    let source = seq.clone();
    LazySeq::lazy_cons(accumulator, move || {
        let next = source
            .head_option()
            .map_or_else(|| previous.clone(), |head| function(&previous, head));
        scan_shared(source.rest(), next, function)
    })
}

fn sliding_windows<T>(seq: &LazySeq<T>, size: usize, first: bool) -> LazySeq<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    if seq.is_empty() {
        return LazySeq::empty();
    }
    let window = seq.take_vec(size);
    if !first && window.len() < size {
        return LazySeq::empty();
    }
    let source = seq.clone();
    LazySeq::lazy_cons(window, move || {
        sliding_windows(source.rest(), size, false)
    })
}

fn grouped_windows<T>(seq: &LazySeq<T>, size: usize) -> LazySeq<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    if seq.is_empty() {
        return LazySeq::empty();
    }
    let group = seq.take_vec(size);
    let source = seq.clone();
    LazySeq::lazy_cons(group, move || {
        grouped_windows(&source.drop_first(size), size)
    })
}

fn distinct_shared<T>(seq: &LazySeq<T>, seen: Arc<Mutex<SeenSet<T>>>) -> LazySeq<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    let mut current = seq;
    while let Some(head) = current.head_option() {
        if seen.lock().insert(head.clone()) {
            let source = current.clone();
            return LazySeq::lazy_cons(head.clone(), move || {
                distinct_shared(source.rest(), seen)
            });
        }
        current = current.rest();
    }
    LazySeq::empty()
}
