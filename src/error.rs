//! Error taxonomy for drives and pull iteration.
//!
//! The engine owns exactly one piece of error semantics of its own:
//! [`Error::Exhausted`], the end-of-sequence signal raised by pull iteration.
//! Everything a producer fails with travels through [`Error::Source`]
//! unchanged; the engine never swallows or retries a producer failure.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by drives, relays, and cursors.
#[derive(Debug, Error)]
pub enum Error {
    /// Pull iteration reached the end of the sequence.
    ///
    /// This is expected control flow, not a defect: callers draining a
    /// [`Cursor`](crate::Cursor) handle it the way they would handle `None`
    /// from an iterator. Classify with [`Error::is_exhausted`].
    #[error("iteration reached the end")]
    Exhausted,

    /// A relay was used without a consumer on the other end.
    ///
    /// Raised when `emit` is called outside an active drive, and when the
    /// downstream consumer of a suspended drive has gone away (for example an
    /// abandoned cursor); in the latter case it unwinds the producer so its
    /// drive thread can exit.
    #[error("relay is not attached to a consumer")]
    Detached,

    /// A producer failed mid-drive; the failure is carried unchanged.
    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a producer failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Error;
    ///
    /// let err = Error::source_err("tape unreadable");
    /// assert_eq!(err.to_string(), "tape unreadable");
    /// ```
    pub fn source_err(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Source(err.into())
    }

    /// Returns `true` if this is the end-of-sequence signal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Error;
    ///
    /// assert!(Error::Exhausted.is_exhausted());
    /// assert!(!Error::Detached.is_exhausted());
    /// ```
    #[inline]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Error::Exhausted)
    }
}
