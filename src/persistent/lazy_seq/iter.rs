//! Iterators over [`LazySeq`].
//!
//! Both iterators advance lazily: yielding an element never forces its tail.
//! The tail is only forced when the *next* element is requested, so
//! `seq.iter().take(n)` evaluates exactly `n` elements.

use super::{LazySeq, LazySeqError};

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over references to elements of a [`LazySeq`].
pub struct Iter<'a, T> {
    current: &'a LazySeq<T>,
    started: bool,
}

impl<'a, T> Iter<'a, T> {
    pub(super) const fn new(seq: &'a LazySeq<T>) -> Self {
        Self {
            current: seq,
            started: false,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.started {
            self.current = self.current.rest();
        }
        self.started = true;
        self.current.head_option()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current.is_empty() {
            (0, Some(0))
        } else {
            (0, None)
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            current: self.current,
            started: self.started,
        }
    }
}

// =============================================================================
// Owning Cursor
// =============================================================================

/// An owning, one-shot cursor over a [`LazySeq`].
///
/// Holds a (cheap, shared) handle to the remaining sequence and yields
/// clones of its elements. Besides [`Iterator::next`], it offers
/// [`advance`](Self::advance), which reports running past the end as an
/// error instead of `None`.
///
/// # Examples
///
/// ```rust
/// use lazyseq::persistent::{LazySeq, LazySeqError};
///
/// let mut cursor = LazySeq::of(["a", "b"]).into_iter();
/// assert_eq!(cursor.advance(), Ok("a"));
/// assert_eq!(cursor.advance(), Ok("b"));
/// assert_eq!(cursor.advance(), Err(LazySeqError::ExhaustedIterator));
/// ```
pub struct IntoIter<T> {
    current: LazySeq<T>,
    started: bool,
}

impl<T> IntoIter<T> {
    pub(super) const fn new(seq: LazySeq<T>) -> Self {
        Self {
            current: seq,
            started: false,
        }
    }

    /// Moves past the previously yielded element, if any.
    fn settle(&mut self) {
        if self.started {
            let next = self.current.rest().clone();
            self.current = next;
            self.started = false;
        }
    }

    /// Returns `true` if another element is available.
    ///
    /// Forces the tail of the previously yielded element.
    pub fn has_next(&mut self) -> bool {
        self.settle();
        !self.current.is_empty()
    }

    /// Returns the remaining sequence, forcing the pending step if any.
    pub fn remaining(&mut self) -> &LazySeq<T> {
        self.settle();
        &self.current
    }
}

impl<T: Clone> IntoIter<T> {
    /// Returns the next element.
    ///
    /// # Errors
    ///
    /// Returns [`LazySeqError::ExhaustedIterator`] once the sequence is
    /// exhausted.
    pub fn advance(&mut self) -> Result<T, LazySeqError> {
        self.next().ok_or(LazySeqError::ExhaustedIterator)
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.settle();
        let element = self.current.head_option()?.clone();
        self.started = true;
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted_naturals(counter: Arc<AtomicUsize>, start: u32) -> LazySeq<u32> {
        LazySeq::lazy_cons(start, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            counted_naturals(counter, start + 1)
        })
    }

    #[rstest]
    fn test_iter_yields_references() {
        let seq = LazySeq::of([1, 2, 3]);
        let collected: Vec<&i32> = seq.iter().collect();
        assert_eq!(collected, vec![&1, &2, &3]);
    }

    #[rstest]
    fn test_iter_on_empty() {
        let seq: LazySeq<i32> = LazySeq::empty();
        assert_eq!(seq.iter().next(), None);
    }

    #[rstest]
    fn test_iter_take_forces_only_what_is_yielded() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seq = counted_naturals(Arc::clone(&counter), 0);

        let first: Vec<u32> = seq.iter().take(3).copied().collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(format!("{seq}"), "[0, 1, 2, ?]");
    }

    #[rstest]
    fn test_iter_exhausted_stays_exhausted() {
        let seq = LazySeq::of([1]);
        let mut iter = seq.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[rstest]
    fn test_into_iter_yields_clones() {
        let seq = LazySeq::of(vec!["x".to_string(), "y".to_string()]);
        let collected: Vec<String> = seq.into_iter().collect();
        assert_eq!(collected, vec!["x".to_string(), "y".to_string()]);
    }

    #[rstest]
    fn test_advance_past_end_is_error() {
        let mut cursor = LazySeq::of([1]).into_iter();
        assert_eq!(cursor.advance(), Ok(1));
        assert_eq!(cursor.advance(), Err(LazySeqError::ExhaustedIterator));
        assert_eq!(cursor.advance(), Err(LazySeqError::ExhaustedIterator));
    }

    #[rstest]
    fn test_has_next_forces_one_step() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut cursor = counted_naturals(Arc::clone(&counter), 10).into_iter();

        assert!(cursor.has_next());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(cursor.next(), Some(10));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(cursor.has_next());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cursor.remaining().head(), Ok(&11));
    }

    #[rstest]
    fn test_for_loop_over_reference() {
        let seq = LazySeq::of([1, 2, 3]);
        let mut sum = 0;
        for element in &seq {
            sum += element;
        }
        assert_eq!(sum, 6);
    }
}
