//! Persistent, lazily evaluated, memoized sequence.
//!
//! This module provides [`LazySeq`], a singly-linked sequence whose head is
//! known immediately but whose tail may be computed on demand. A computed tail
//! is cached in the node, so every later observer (on any thread) sees the same
//! successor without recomputation.
//!
//! # Representation
//!
//! Every sequence is one of three node variants:
//!
//! ```text
//! Empty                                  terminal, no head, no tail
//! Eager { head, tail: LazySeq }          successor already materialized
//! Lazy  { head, tail: MemoCell<LazySeq> } successor computed once on demand
//! ```
//!
//! Nodes are reference counted and immutable. The only mutation anywhere in
//! the structure is the write-once resolution of a lazy node's tail, guarded
//! by a per-node [`MemoCell`].
//!
//! # Laziness
//!
//! Combinators never force more of their input than the caller demands from
//! the result. Rendering with `{}` shows how much has been computed so far:
//!
//! ```rust
//! use lazyseq::persistent::LazySeq;
//!
//! let naturals = LazySeq::numbers(1);
//! assert_eq!(format!("{naturals}"), "[1, ?]");
//!
//! let first: Vec<i64> = naturals.take(3).to_vec();
//! assert_eq!(first, vec![1, 2, 3]);
//! assert_eq!(format!("{naturals}"), "[1, 2, 3, ?]");
//! ```
//!
//! # Structural Sharing
//!
//! A sequence and the result of dropping its first elements share nodes:
//!
//! ```text
//! seq:               1 -> 2 -> 3 -> ?
//! seq.drop_first(1):      [2 -> 3 -> ?]  // same nodes as seq
//! ```

mod builders;
mod combinators;
mod error;
mod iter;
mod terminal;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::control::MemoCell;

pub use error::LazySeqError;
pub use iter::{IntoIter, Iter};

/// A node whose successor is already known.
struct EagerCons<T> {
    head: T,
    tail: LazySeq<T>,
}

/// A node whose successor is computed once, on first demand.
struct LazyCons<T> {
    head: T,
    tail: MemoCell<LazySeq<T>>,
}

enum Node<T> {
    Empty,
    Eager(Arc<EagerCons<T>>),
    Lazy(Arc<LazyCons<T>>),
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Eager(cons) => Self::Eager(Arc::clone(cons)),
            Self::Lazy(cons) => Self::Lazy(Arc::clone(cons)),
        }
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::Empty
    }
}

/// A persistent, lazily evaluated, memoized sequence.
///
/// Cloning a `LazySeq` is O(1): it shares the underlying nodes, including
/// any tails already computed.
///
/// `LazySeq<T>` is `Send + Sync` when `T: Send + Sync`. Any number of threads
/// may traverse the same sequence; each lazy tail is computed at most once.
///
/// # Time Complexity
///
/// | Operation          | Complexity                         |
/// |--------------------|------------------------------------|
/// | `empty` / `cons`   | O(1)                               |
/// | `head`             | O(1)                               |
/// | `tail`             | O(1) plus the first evaluation     |
/// | `get(n)` / `drop_first(n)` | O(n)                       |
/// | `len`              | O(n), forces the whole sequence    |
///
/// # Examples
///
/// ```rust
/// use lazyseq::persistent::LazySeq;
///
/// let squares = LazySeq::numbers(1).map(|n| n * n);
/// assert_eq!(squares.take(4).to_vec(), vec![1, 4, 9, 16]);
/// ```
pub struct LazySeq<T> {
    node: Node<T>,
}

impl<T> LazySeq<T> {
    /// Creates an empty sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let empty: LazySeq<i32> = LazySeq::empty();
    /// assert!(empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { node: Node::Empty }
    }

    /// Creates a sequence from a head and an already known tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::cons(1, LazySeq::cons(2, LazySeq::empty()));
    /// assert_eq!(format!("{seq}"), "[1, 2]");
    /// ```
    #[inline]
    #[must_use]
    pub fn cons(head: T, tail: Self) -> Self {
        Self {
            node: Node::Eager(Arc::new(EagerCons { head, tail })),
        }
    }

    /// Creates a sequence from a head and a computation producing the tail.
    ///
    /// The computation runs at most once, the first time the tail is
    /// demanded, and its result is cached.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::lazy_cons(1, || LazySeq::of([2, 3]));
    /// assert_eq!(format!("{seq}"), "[1, ?]");
    /// assert_eq!(seq.len(), 3);
    /// assert_eq!(format!("{seq}"), "[1, 2, 3]");
    /// ```
    #[inline]
    #[must_use]
    pub fn lazy_cons<F>(head: T, tail: F) -> Self
    where
        F: FnOnce() -> Self + Send + 'static,
    {
        Self {
            node: Node::Lazy(Arc::new(LazyCons {
                head,
                tail: MemoCell::new(tail),
            })),
        }
    }

    /// Returns a new sequence with `head` prepended, sharing this one as tail.
    #[inline]
    #[must_use]
    pub fn prepend(&self, head: T) -> Self {
        Self::cons(head, self.clone())
    }

    /// Returns `true` if the sequence has no elements. Never forces.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.node, Node::Empty)
    }

    /// Returns a reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`LazySeqError::EmptySequence`] if the sequence is empty.
    #[inline]
    pub fn head(&self) -> Result<&T, LazySeqError> {
        self.head_option()
            .ok_or(LazySeqError::EmptySequence { operation: "head" })
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn head_option(&self) -> Option<&T> {
        match &self.node {
            Node::Empty => None,
            Node::Eager(cons) => Some(&cons.head),
            Node::Lazy(cons) => Some(&cons.head),
        }
    }

    /// Returns the sequence without its first element.
    ///
    /// For a lazily built node this evaluates the tail on the first call and
    /// returns the cached result afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`LazySeqError::EmptySequence`] if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::persistent::LazySeq;
    ///
    /// let seq = LazySeq::of([1, 2, 3]);
    /// assert_eq!(seq.tail().unwrap().head(), Ok(&2));
    /// ```
    #[inline]
    pub fn tail(&self) -> Result<&Self, LazySeqError> {
        if self.is_empty() {
            Err(LazySeqError::EmptySequence { operation: "tail" })
        } else {
            Ok(self.rest())
        }
    }

    /// Decomposes the sequence into its head and (forced) tail.
    #[inline]
    #[must_use]
    pub fn uncons(&self) -> Option<(&T, &Self)> {
        self.head_option().map(|head| (head, self.rest()))
    }

    /// Returns `true` if the tail is available without computation.
    ///
    /// Always `true` for empty and eagerly built nodes. Never forces.
    #[inline]
    #[must_use]
    pub fn is_tail_resolved(&self) -> bool {
        match &self.node {
            Node::Empty | Node::Eager(_) => true,
            Node::Lazy(cons) => cons.tail.is_resolved(),
        }
    }

    /// Returns `true` if both sequences are the same node.
    ///
    /// Two empty sequences are always the same node.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.node, &other.node) {
            (Node::Empty, Node::Empty) => true,
            (Node::Eager(left), Node::Eager(right)) => Arc::ptr_eq(left, right),
            (Node::Lazy(left), Node::Lazy(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns an iterator over references to the elements.
    ///
    /// The iterator forces one tail per element it moves past, and never the
    /// tail of the last element it yielded.
    #[inline]
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// The tail, or `self` when already empty. Forces lazy tails.
    pub(crate) fn rest(&self) -> &Self {
        match &self.node {
            Node::Empty => self,
            Node::Eager(cons) => &cons.tail,
            Node::Lazy(cons) => cons.tail.force(),
        }
    }

    /// The tail if it is known without forcing.
    pub(crate) fn resolved_rest(&self) -> Option<&Self> {
        match &self.node {
            Node::Empty => None,
            Node::Eager(cons) => Some(&cons.tail),
            Node::Lazy(cons) => cons.tail.get(),
        }
    }

    /// Writes the evaluated prefix without forcing anything.
    ///
    /// An unresolved tail is rendered as `?` after a separator.
    fn write_evaluated<W, F>(
        &self,
        out: &mut W,
        start: &str,
        separator: &str,
        end: &str,
        mut write_element: F,
    ) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut W, &T) -> fmt::Result,
    {
        out.write_str(start)?;
        let mut current = self;
        let mut first = true;
        while let Some(head) = current.head_option() {
            if !first {
                out.write_str(separator)?;
            }
            first = false;
            write_element(out, head)?;
            match current.resolved_rest() {
                Some(next) => current = next,
                None => {
                    out.write_str(separator)?;
                    out.write_str("?")?;
                    break;
                }
            }
        }
        out.write_str(end)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for LazySeq<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T> Default for LazySeq<T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

/// Unlinks uniquely owned nodes one at a time.
///
/// The default recursive drop would use one stack frame per node and
/// overflow on long, fully evaluated sequences.
impl<T> Drop for LazySeq<T> {
    fn drop(&mut self) {
        let mut node = std::mem::take(&mut self.node);
        loop {
            let mut next = match node {
                Node::Empty => return,
                Node::Eager(cons) => match Arc::try_unwrap(cons) {
                    Ok(cons) => cons.tail,
                    Err(_) => return,
                },
                Node::Lazy(cons) => match Arc::try_unwrap(cons) {
                    Ok(cons) => match cons.tail.into_inner() {
                        Some(tail) => tail,
                        None => return,
                    },
                    Err(_) => return,
                },
            };
            node = std::mem::take(&mut next.node);
        }
    }
}

/// Structural equality.
///
/// Walks both sequences in lockstep, forcing tails as needed, and stops as
/// soon as both sides reach the same node. Comparing two distinct infinite
/// sequences that agree everywhere does not terminate; use
/// [`LazySeq::eq_bounded`] for those.
impl<T: PartialEq> PartialEq for LazySeq<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self;
        let mut right = other;
        loop {
            if left.ptr_eq(right) {
                return true;
            }
            match (left.head_option(), right.head_option()) {
                (None, None) => return true,
                (Some(left_head), Some(right_head)) if left_head == right_head => {
                    left = left.rest();
                    right = right.rest();
                }
                _ => return false,
            }
        }
    }
}

impl<T: Eq> Eq for LazySeq<T> {}

/// Hashes every element in order, then the length.
///
/// Forces the whole sequence; do not hash infinite sequences.
impl<T: Hash> Hash for LazySeq<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut length = 0usize;
        for element in self {
            element.hash(state);
            length += 1;
        }
        length.hash(state);
    }
}

/// Renders the evaluated prefix: `[1, 2, 3]`, or `[1, 2, ?]` when the rest
/// has not been computed yet. Never forces.
impl<T: fmt::Display> fmt::Display for LazySeq<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_evaluated(formatter, "[", ", ", "]", |out, element| {
            write!(out, "{element}")
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for LazySeq<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_evaluated(formatter, "[", ", ", "]", |out, element| {
            write!(out, "{element:?}")
        })
    }
}

impl<T> FromIterator<T> for LazySeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<T: Clone> IntoIterator for LazySeq<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a LazySeq<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

static_assertions::assert_impl_all!(LazySeq<i32>: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(LazySeq<String>: Send, Sync);
static_assertions::assert_not_impl_any!(LazySeq<std::rc::Rc<i32>>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for LazySeq<T> {
    /// Serializes every element, forcing the whole sequence.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(None)?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct LazySeqVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::de::Visitor<'de> for LazySeqVisitor<T> {
    type Value = LazySeq<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(element) = access.next_element()? {
            elements.push(element);
        }
        Ok(LazySeq::of(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for LazySeq<T> {
    /// Deserializes into an eagerly built sequence.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(LazySeqVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
