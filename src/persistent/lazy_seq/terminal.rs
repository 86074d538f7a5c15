//! Strict operations that consume a [`LazySeq`].
//!
//! Everything here walks the sequence with a loop over the tail chain and
//! forces as much of it as the answer requires. Operations that must see
//! every element (`len`, `fold`, `to_vec`, `sorted`, ...) do not terminate
//! on infinite sequences; the short-circuiting ones (`any_match`, `get`,
//! `starts_with`, ...) stop forcing as soon as the answer is known.

use std::cmp::Ordering;
use std::fmt::{self, Write as _};

use super::LazySeq;

impl<T> LazySeq<T> {
    /// Returns the number of elements, forcing the whole sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// assert_eq!(LazySeq::numbers(0).take(5).len(), 5);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns the element at `index`, or `None` if the sequence is shorter.
    ///
    /// Forces `index` tails; never the tail of the returned element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let naturals = LazySeq::numbers(0);
    /// assert_eq!(naturals.get(3), Some(&3));
    /// assert_eq!(format!("{naturals}"), "[0, 1, 2, 3, ?]");
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    /// Evaluates the whole sequence and returns it.
    ///
    /// After this call every tail is cached, so later traversals never run
    /// deferred computations.
    pub fn force(&self) -> &Self {
        let mut current = self;
        while !current.is_empty() {
            current = current.rest();
        }
        self
    }

    /// Calls `action` on every element in order.
    pub fn for_each<F>(&self, action: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(action);
    }

    /// Strict left fold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let total = LazySeq::of([1, 2, 3]).fold(10, |acc, x| acc + x);
    /// assert_eq!(total, 16);
    /// ```
    pub fn fold<A, F>(&self, initial: A, function: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.iter().fold(initial, function)
    }

    /// Left fold seeded with the first element.
    ///
    /// Returns `None` for an empty sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// assert_eq!(LazySeq::of([3, 1, 4]).reduce(|a, b| a * b), Some(12));
    /// assert_eq!(LazySeq::of([7]).reduce(|a, b| a + b), Some(7));
    /// assert_eq!(LazySeq::<i32>::empty().reduce(|a, b| a + b), None);
    /// ```
    pub fn reduce<F>(&self, function: F) -> Option<T>
    where
        T: Clone,
        F: FnMut(T, &T) -> T,
    {
        let (head, tail) = self.uncons()?;
        Some(tail.fold(head.clone(), function))
    }

    /// Returns the minimum with respect to `compare`.
    ///
    /// Ties keep the earliest element.
    pub fn min_by<F>(&self, mut compare: F) -> Option<&T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.iter().fold(None, |best, element| match best {
            Some(current) if compare(element, current) != Ordering::Less => Some(current),
            _ => Some(element),
        })
    }

    /// Returns the maximum with respect to `compare`.
    ///
    /// Ties keep the earliest element.
    pub fn max_by<F>(&self, mut compare: F) -> Option<&T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.iter().fold(None, |best, element| match best {
            Some(current) if compare(element, current) != Ordering::Greater => Some(current),
            _ => Some(element),
        })
    }

    /// Returns the element with the smallest key; ties keep the earliest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let words = LazySeq::of(["pear", "fig", "kiwi", "yam"]);
    /// assert_eq!(words.min_by_key(|word| word.len()), Some(&"fig"));
    /// assert_eq!(words.max_by_key(|word| word.len()), Some(&"pear"));
    /// ```
    pub fn min_by_key<K, F>(&self, mut key: F) -> Option<&T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.iter()
            .map(|element| (key(element), element))
            .fold(None, |best: Option<(K, &T)>, (candidate_key, element)| match best {
                Some((best_key, current)) if candidate_key >= best_key => {
                    Some((best_key, current))
                }
                _ => Some((candidate_key, element)),
            })
            .map(|(_, element)| element)
    }

    /// Returns the element with the largest key; ties keep the earliest.
    pub fn max_by_key<K, F>(&self, mut key: F) -> Option<&T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.iter()
            .map(|element| (key(element), element))
            .fold(None, |best: Option<(K, &T)>, (candidate_key, element)| match best {
                Some((best_key, current)) if candidate_key <= best_key => {
                    Some((best_key, current))
                }
                _ => Some((candidate_key, element)),
            })
            .map(|(_, element)| element)
    }

    /// Returns the smallest element; ties keep the earliest.
    #[must_use]
    pub fn min(&self) -> Option<&T>
    where
        T: Ord,
    {
        self.min_by(Ord::cmp)
    }

    /// Returns the largest element; ties keep the earliest.
    #[must_use]
    pub fn max(&self) -> Option<&T>
    where
        T: Ord,
    {
        self.max_by(Ord::cmp)
    }

    /// Returns `true` if some element satisfies `predicate`.
    ///
    /// Stops forcing at the first match, so it terminates on an infinite
    /// sequence that contains one.
    pub fn any_match<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Returns `true` if every element satisfies `predicate`.
    ///
    /// Stops forcing at the first failure.
    pub fn all_match<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(predicate)
    }

    /// Returns `true` if no element satisfies `predicate`.
    pub fn none_match<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        !self.any_match(predicate)
    }

    /// Returns `true` if `value` occurs in the sequence.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.any_match(|element| element == value)
    }

    /// Returns `true` if the sequence begins with the elements of `prefix`.
    ///
    /// An empty prefix always matches. Forces no more of this sequence than
    /// the prefix is long.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let naturals = LazySeq::numbers(1);
    /// assert!(naturals.starts_with(&[1, 2, 3]));
    /// assert!(!naturals.starts_with(&[1, 3]));
    /// assert!(!LazySeq::of([1]).starts_with(&[1, 2]));
    /// ```
    pub fn starts_with<'b, I>(&self, prefix: I) -> bool
    where
        T: PartialEq + 'b,
        I: IntoIterator<Item = &'b T>,
    {
        let mut elements = self.iter();
        prefix
            .into_iter()
            .all(|expected| elements.next() == Some(expected))
    }

    /// Compares with `other` element by element, giving up after `limit`
    /// agreeing elements.
    ///
    /// Returns `Some(false)` on a mismatch (or length difference) among the
    /// first `limit` positions, `Some(true)` when both sequences end
    /// together or reach a shared node, and `None` when the first `limit`
    /// elements agree and neither side has ended. Usable on infinite sequences, unlike `==`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let evens = LazySeq::numbers_by(0, 2);
    /// let doubled = LazySeq::numbers(0).map(|n| n * 2);
    /// assert_eq!(evens.eq_bounded(&doubled, 100), None);
    /// assert_eq!(evens.eq_bounded(&LazySeq::numbers(0), 100), Some(false));
    /// assert_eq!(LazySeq::of([1, 2]).eq_bounded(&LazySeq::of([1, 2]), 100), Some(true));
    /// ```
    #[must_use]
    pub fn eq_bounded(&self, other: &Self, limit: usize) -> Option<bool>
    where
        T: PartialEq,
    {
        let mut left = self;
        let mut right = other;
        let mut compared = 0;
        loop {
            if left.ptr_eq(right) {
                return Some(true);
            }
            match (left.head_option(), right.head_option()) {
                (None, None) => return Some(true),
                (Some(left_head), Some(right_head)) if left_head == right_head => {
                    if compared == limit {
                        return None;
                    }
                    compared += 1;
                    left = left.rest();
                    right = right.rest();
                }
                (Some(_), Some(_)) if compared == limit => return None,
                _ => return Some(false),
            }
        }
    }

    /// Collects every element into a `Vec`, forcing the whole sequence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Returns a sorted, fully evaluated copy. The sort is stable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::of([3, 1, 2]).sorted();
    /// assert_eq!(format!("{seq}"), "[1, 2, 3]");
    /// ```
    #[must_use]
    pub fn sorted(&self) -> Self
    where
        T: Clone + Ord,
    {
        self.sorted_by(Ord::cmp)
    }

    /// Returns a copy sorted with `compare`. The sort is stable.
    #[must_use]
    pub fn sorted_by<F>(&self, compare: F) -> Self
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut elements = self.to_vec();
        elements.sort_by(compare);
        Self::of(elements)
    }

    /// Renders every element separated by `separator`, forcing the whole
    /// sequence.
    ///
    /// # Panics
    ///
    /// Panics if an element's [`Display`](fmt::Display) implementation
    /// returns an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// assert_eq!(LazySeq::of(['x', 'y', 'z']).mk_string(", "), "x, y, z");
    /// ```
    #[must_use]
    pub fn mk_string(&self, separator: &str) -> String
    where
        T: fmt::Display,
    {
        self.mk_string_with("", separator, "", false)
    }

    /// Renders the elements between `start` and `end`.
    ///
    /// With `lazy` set, nothing is forced: only the evaluated prefix is
    /// rendered, and an unevaluated remainder shows up as `?`. Otherwise the
    /// whole sequence is forced first.
    ///
    /// # Panics
    ///
    /// Panics if an element's [`Display`](fmt::Display) implementation
    /// returns an error, like [`ToString::to_string`] does.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let naturals = LazySeq::numbers(1);
    /// let _ = naturals.get(2);
    /// assert_eq!(naturals.mk_string_with("<", "; ", ">", true), "<1; 2; 3; ?>");
    /// assert_eq!(LazySeq::of([1, 2]).mk_string_with("foo", "", "bar", false), "foo12bar");
    /// ```
    #[must_use]
    pub fn mk_string_with(&self, start: &str, separator: &str, end: &str, lazy: bool) -> String
    where
        T: fmt::Display,
    {
        if !lazy {
            self.force();
        }
        let mut rendered = String::new();
        self.write_evaluated(&mut rendered, start, separator, end, |out, element| {
            write!(out, "{element}")
        })
        .expect("a Display implementation returned an error unexpectedly");
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn counted_naturals(forced: Arc<AtomicUsize>, start: i32) -> LazySeq<i32> {
        LazySeq::lazy_cons(start, move || {
            forced.fetch_add(1, AtomicOrdering::SeqCst);
            counted_naturals(forced, start + 1)
        })
    }

    // =========================================================================
    // Length and Access
    // =========================================================================

    #[rstest]
    #[case(LazySeq::empty(), 0)]
    #[case(LazySeq::of([1]), 1)]
    #[case(LazySeq::of([1, 2, 3]), 3)]
    fn test_len(#[case] seq: LazySeq<i32>, #[case] expected: usize) {
        assert_eq!(seq.len(), expected);
    }

    #[rstest]
    fn test_get_out_of_range() {
        assert_eq!(LazySeq::of([1, 2]).get(2), None);
        assert_eq!(LazySeq::<i32>::empty().get(0), None);
    }

    #[rstest]
    fn test_get_forces_only_index_tails() {
        let forced = Arc::new(AtomicUsize::new(0));
        let seq = counted_naturals(Arc::clone(&forced), 0);
        assert_eq!(seq.get(3), Some(&3));
        assert_eq!(forced.load(AtomicOrdering::SeqCst), 3);
    }

    #[rstest]
    fn test_force_resolves_every_tail() {
        let seq = LazySeq::numbers(0).take(4);
        assert_eq!(format!("{seq}"), "[0, ?]");
        seq.force();
        assert_eq!(format!("{seq}"), "[0, 1, 2, 3]");
    }

    #[rstest]
    fn test_for_each_visits_in_order() {
        let mut visited = Vec::new();
        LazySeq::of([3, 1, 2]).for_each(|x| visited.push(*x));
        assert_eq!(visited, vec![3, 1, 2]);
    }

    // =========================================================================
    // Folds
    // =========================================================================

    #[rstest]
    fn test_fold_empty_returns_initial() {
        assert_eq!(LazySeq::<i32>::empty().fold(5, |acc, x| acc + x), 5);
    }

    #[rstest]
    fn test_fold_is_left_associative() {
        let rendered = LazySeq::of(['a', 'b', 'c']).fold(String::from("_"), |acc, c| format!("({acc}{c})"));
        assert_eq!(rendered, "(((_a)b)c)");
    }

    #[rstest]
    fn test_reduce_starts_from_head() {
        let difference = LazySeq::of([10, 3, 2]).reduce(|acc, x| acc - x);
        assert_eq!(difference, Some(5));
    }

    #[rstest]
    fn test_fold_long_sequence() {
        let total = LazySeq::numbers(1).take(100_000).fold(0_i64, |acc, x| acc + x);
        assert_eq!(total, 5_000_050_000);
    }

    // =========================================================================
    // Min / Max
    // =========================================================================

    #[rstest]
    fn test_min_max_empty() {
        let seq: LazySeq<i32> = LazySeq::empty();
        assert_eq!(seq.min(), None);
        assert_eq!(seq.max(), None);
    }

    #[rstest]
    fn test_min_max() {
        let seq = LazySeq::of([4, -2, 9, 0]);
        assert_eq!(seq.min(), Some(&-2));
        assert_eq!(seq.max(), Some(&9));
    }

    #[rstest]
    fn test_min_by_ties_keep_earliest() {
        let seq = LazySeq::of([(1, 'a'), (0, 'b'), (0, 'c')]);
        assert_eq!(seq.min_by(|a, b| a.0.cmp(&b.0)), Some(&(0, 'b')));
    }

    #[rstest]
    fn test_max_by_ties_keep_earliest() {
        let seq = LazySeq::of([(1, 'a'), (2, 'b'), (2, 'c')]);
        assert_eq!(seq.max_by(|a, b| a.0.cmp(&b.0)), Some(&(2, 'b')));
    }

    #[rstest]
    fn test_by_key_ties_keep_earliest() {
        let seq = LazySeq::of(["bb", "a", "c", "dd"]);
        assert_eq!(seq.min_by_key(|s| s.len()), Some(&"a"));
        assert_eq!(seq.max_by_key(|s| s.len()), Some(&"bb"));
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    #[rstest]
    fn test_any_match_short_circuits_on_infinite() {
        assert!(LazySeq::numbers(0).any_match(|x| *x == 1_000));
    }

    #[rstest]
    fn test_all_match_short_circuits_on_infinite() {
        assert!(!LazySeq::numbers(0).all_match(|x| *x < 10));
    }

    #[rstest]
    fn test_matches_on_empty() {
        let seq: LazySeq<i32> = LazySeq::empty();
        assert!(!seq.any_match(|_| true));
        assert!(seq.all_match(|_| false));
        assert!(seq.none_match(|_| true));
    }

    #[rstest]
    fn test_contains() {
        let seq = LazySeq::of(["a", "b"]);
        assert!(seq.contains(&"b"));
        assert!(!seq.contains(&"c"));
    }

    #[rstest]
    fn test_starts_with_empty_prefix() {
        let seq: LazySeq<i32> = LazySeq::empty();
        assert!(seq.starts_with(&[]));
    }

    #[rstest]
    fn test_starts_with_does_not_force_past_prefix() {
        let forced = Arc::new(AtomicUsize::new(0));
        let seq = counted_naturals(Arc::clone(&forced), 0);
        assert!(seq.starts_with(&[0, 1]));
        assert_eq!(forced.load(AtomicOrdering::SeqCst), 1);
    }

    #[rstest]
    fn test_starts_with_accepts_sequence_prefix() {
        let seq = LazySeq::numbers(5);
        assert!(seq.starts_with(&LazySeq::of([5, 6, 7])));
    }

    // =========================================================================
    // Bounded Equality
    // =========================================================================

    #[rstest]
    fn test_eq_bounded_mismatch_within_limit() {
        let left = LazySeq::numbers(0);
        let right = LazySeq::concat([0, 1, 7], LazySeq::numbers(3));
        assert_eq!(left.eq_bounded(&right, 10), Some(false));
    }

    #[rstest]
    fn test_eq_bounded_mismatch_beyond_limit_is_undecided() {
        let left = LazySeq::numbers(0);
        let right = LazySeq::concat([0, 1, 7], LazySeq::numbers(3));
        assert_eq!(left.eq_bounded(&right, 2), None);
    }

    #[rstest]
    fn test_eq_bounded_different_lengths() {
        assert_eq!(LazySeq::of([1, 2]).eq_bounded(&LazySeq::of([1]), 5), Some(false));
    }

    #[rstest]
    fn test_eq_bounded_shared_node() {
        let naturals = LazySeq::numbers(0);
        assert_eq!(naturals.eq_bounded(&naturals.clone(), 0), Some(true));
    }

    // =========================================================================
    // Conversion and Rendering
    // =========================================================================

    #[rstest]
    fn test_sorted_by_is_stable() {
        let seq = LazySeq::of([(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
        let sorted = seq.sorted_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(sorted.to_vec(), vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[rstest]
    #[case(LazySeq::empty(), "")]
    #[case(LazySeq::of(['x']), "x")]
    #[case(LazySeq::of(['x', 'y']), "x, y")]
    fn test_mk_string(#[case] seq: LazySeq<char>, #[case] expected: &str) {
        assert_eq!(seq.mk_string(", "), expected);
    }

    #[rstest]
    fn test_mk_string_with_brackets() {
        assert_eq!(LazySeq::<char>::empty().mk_string_with("[", ", ", "]", false), "[]");
        assert_eq!(LazySeq::of(['x', 'y']).mk_string_with("{", "; ", "}", false), "{x; y}");
    }

    #[rstest]
    fn test_mk_string_forces_unless_lazy() {
        let seq = LazySeq::numbers(1).take(4);
        assert_eq!(seq.mk_string_with("[", ", ", "]", true), "[1, ?]");
        assert_eq!(seq.mk_string(", "), "1, 2, 3, 4");
        assert_eq!(seq.mk_string_with("[", ", ", "]", true), "[1, 2, 3, 4]");
    }

    struct Flaky(i32);

    impl fmt::Display for Flaky {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            if self.0 == 2 {
                Err(fmt::Error)
            } else {
                write!(formatter, "{}", self.0)
            }
        }
    }

    #[rstest]
    #[should_panic(expected = "a Display implementation returned an error unexpectedly")]
    fn test_mk_string_with_failing_display_panics() {
        let seq = LazySeq::of([Flaky(1), Flaky(2), Flaky(3)]);
        let _ = seq.mk_string_with("[", ", ", "]", false);
    }

    #[rstest]
    fn test_mk_string_with_skips_failing_display_outside_prefix() {
        let seq = LazySeq::concat_lazy(vec![Flaky(1)], || LazySeq::of([Flaky(2)]));
        assert_eq!(seq.mk_string_with("[", ", ", "]", true), "[1, ?]");
    }
}
