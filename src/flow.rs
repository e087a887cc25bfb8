/// Signal returned by a downstream consumer to the producer that feeds it.
///
/// `Flow` is the return type of consumer callbacks and of [`Relay::emit`],
/// similar to how `Option` represents optional values and `Result` represents
/// fallible operations: it carries the consumer's verdict back upstream so a
/// producer can decide whether to keep emitting.
///
/// [`Relay::emit`]: crate::Relay::emit
///
/// # Examples
///
/// ```rust
/// use redrive::Flow;
///
/// let keep_going = Flow::Continue;
/// let stop: Flow = Flow::Break;
///
/// assert!(keep_going.is_continue());
/// assert!(stop.is_break());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Keep emitting; the consumer wants more values.
    Continue,
    /// Stop emitting; the consumer has seen enough.
    Break,
}

impl Flow {
    /// Returns `true` if the signal is `Continue`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Flow;
    ///
    /// assert!(Flow::Continue.is_continue());
    /// assert!(!Flow::Break.is_continue());
    /// ```
    #[inline]
    pub const fn is_continue(&self) -> bool {
        matches!(self, Flow::Continue)
    }

    /// Returns `true` if the signal is `Break`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Flow;
    ///
    /// assert!(Flow::Break.is_break());
    /// assert!(!Flow::Continue.is_break());
    /// ```
    #[inline]
    pub const fn is_break(&self) -> bool {
        matches!(self, Flow::Break)
    }

    /// Combine two signals, breaking if either side breaks.
    ///
    /// Useful when a combinator fans one value out into several emissions and
    /// has to fold the downstream verdicts back into one.
    #[inline]
    pub const fn and(self, other: Flow) -> Flow {
        match (self, other) {
            (Flow::Continue, Flow::Continue) => Flow::Continue,
            _ => Flow::Break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_match_variants() {
        assert!(Flow::Continue.is_continue());
        assert!(!Flow::Continue.is_break());
        assert!(Flow::Break.is_break());
        assert!(!Flow::Break.is_continue());
    }

    #[test]
    fn test_and_breaks_if_either_breaks() {
        assert_eq!(Flow::Continue.and(Flow::Continue), Flow::Continue);
        assert_eq!(Flow::Continue.and(Flow::Break), Flow::Break);
        assert_eq!(Flow::Break.and(Flow::Continue), Flow::Break);
        assert_eq!(Flow::Break.and(Flow::Break), Flow::Break);
    }
}
