//! Error types returned by [`Pull::next`](crate::Pull::next).
//!
//! This module defines:
//!
//! - [`IterError`]: the terminal signal returned on the `Err` side of `next`.
//! - [`ErrorKind`]: the three causes a caller discriminates on.
//!
//! A finite source annotates its exhaustion error with context, so the error a caller sees may be
//! an [`IterError::Context`] wrapping [`IterError::NoSuchElement`]. Always match on
//! [`IterError::kind`] rather than on the outer variant.
//!
//! In-band errors (elements that classify as errors) are **not** `IterError`s. They arrive as
//! `Ok(Item::Error(..))`.

use std::borrow::Cow;

use thiserror::Error;

/// # Cause of a terminal `next` result.
///
/// Exactly one kind is reported per failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source has no more elements. Expected, not a fault.
    Exhausted,
    /// The consumer's token was cancelled.
    CancelledBySubscription,
    /// The iterator's own scope was cancelled, independently of the consumer.
    CancelledByIterator,
}

impl ErrorKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ErrorKind::Exhausted => "exhausted",
            ErrorKind::CancelledBySubscription => "cancelled_by_subscription",
            ErrorKind::CancelledByIterator => "cancelled_by_iterator",
        }
    }
}

/// # Terminal errors produced by iterators.
///
/// ## Example
/// ```
/// use pullsource::{ErrorKind, IterError};
///
/// let err = IterError::NoSuchElement.context("range has no more elements");
/// assert_eq!(err.kind(), ErrorKind::Exhausted);
/// assert_eq!(err.to_string(), "range has no more elements: no such element");
/// ```
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IterError {
    /// The source has no more elements.
    #[error("no such element")]
    NoSuchElement,

    /// The subscription that drives the iterator was cancelled.
    #[error("subscription cancelled")]
    CancelledSubscription,

    /// The iterator cancelled its own scope.
    #[error("iterator cancelled")]
    CancelledIterator,

    /// Another iterator error annotated with a human-readable context.
    #[error("{context}: {source}")]
    Context {
        /// Description of where the error was raised.
        context: Cow<'static, str>,
        /// The wrapped error.
        #[source]
        source: Box<IterError>,
    },
}

impl IterError {
    /// Wraps `self` with a context message, keeping the underlying kind matchable.
    pub fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        IterError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every [`IterError::Context`] layer.
    pub fn cause(&self) -> &IterError {
        let mut cur = self;
        while let IterError::Context { source, .. } = cur {
            cur = source;
        }
        cur
    }

    /// Returns the cause classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.cause() {
            IterError::CancelledSubscription => ErrorKind::CancelledBySubscription,
            IterError::CancelledIterator => ErrorKind::CancelledByIterator,
            // `cause()` never yields `Context`.
            IterError::NoSuchElement | IterError::Context { .. } => ErrorKind::Exhausted,
        }
    }

    /// `true` when the source simply ran out of elements.
    pub fn is_exhausted(&self) -> bool {
        self.kind() == ErrorKind::Exhausted
    }

    /// `true` when iteration was aborted by either party.
    ///
    /// # Example
    /// ```
    /// use pullsource::IterError;
    ///
    /// assert!(IterError::CancelledIterator.is_cancelled());
    /// assert!(!IterError::NoSuchElement.is_cancelled());
    /// ```
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CancelledBySubscription | ErrorKind::CancelledByIterator
        )
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self.cause() {
            IterError::NoSuchElement | IterError::Context { .. } => "iter_no_such_element",
            IterError::CancelledSubscription => "iter_cancelled_subscription",
            IterError::CancelledIterator => "iter_cancelled_iterator",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            IterError::Context { context, source } => {
                format!("{context} ({})", source.as_message())
            }
            IterError::NoSuchElement => "no more elements".to_string(),
            IterError::CancelledSubscription => "cancelled by subscription".to_string(),
            IterError::CancelledIterator => "cancelled by iterator".to_string(),
        }
    }
}
