//! Error types for lazy sequence operations.

use std::fmt;

/// Represents errors raised by [`LazySeq`](super::LazySeq) operations.
///
/// All errors are raised synchronously by the call that violates a
/// precondition. Argument checks happen before any lazy computation is
/// deferred, so a bad argument fails immediately instead of surfacing later
/// while the result is being forced.
///
/// # Examples
///
/// ```rust
/// use lazyseq::persistent::{LazySeq, LazySeqError};
///
/// let empty: LazySeq<i32> = LazySeq::empty();
/// assert_eq!(
///     empty.head(),
///     Err(LazySeqError::EmptySequence { operation: "head" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazySeqError {
    /// `head` or `tail` was requested from an empty sequence.
    EmptySequence {
        /// The name of the operation that was attempted.
        operation: &'static str,
    },
    /// An operation received a parameter outside its domain.
    InvalidArgument {
        /// The name of the operation that rejected the argument.
        operation: &'static str,
        /// A description of the violated constraint.
        message: String,
    },
    /// An iterator was advanced past the end of its sequence.
    ExhaustedIterator,
}

impl LazySeqError {
    pub(crate) fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for LazySeqError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence { operation } => {
                write!(formatter, "{operation} of empty sequence")
            }
            Self::InvalidArgument { operation, message } => {
                write!(formatter, "{operation}: invalid argument: {message}")
            }
            Self::ExhaustedIterator => {
                write!(formatter, "iterator advanced past the end of the sequence")
            }
        }
    }
}

impl std::error::Error for LazySeqError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_empty_sequence_display() {
        let error = LazySeqError::EmptySequence { operation: "tail" };
        assert_eq!(format!("{error}"), "tail of empty sequence");
    }

    #[rstest]
    fn test_invalid_argument_display() {
        let error = LazySeqError::invalid_argument("grouped", "window size must be positive");
        assert_eq!(
            format!("{error}"),
            "grouped: invalid argument: window size must be positive"
        );
    }

    #[rstest]
    fn test_exhausted_iterator_display() {
        assert_eq!(
            format!("{}", LazySeqError::ExhaustedIterator),
            "iterator advanced past the end of the sequence"
        );
    }

    #[rstest]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(LazySeqError::ExhaustedIterator);
        assert!(error.source().is_none());
    }
}
