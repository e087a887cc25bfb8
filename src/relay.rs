//! The conduit a generator block emits through.
//!
//! A [`Relay`] is handed to a producer for the duration of exactly one drive.
//! It holds the single binding to the downstream callback attached at the
//! start of that drive, and [`Relay::emit`] is the one point where control
//! transfers from producer to consumer: the callback's [`Flow`] verdict is
//! returned verbatim, so a generator block can make its own early-exit
//! decisions based on what the downstream side signals back.
//!
//! A relay never outlives its drive and is never re-attached; each call to
//! [`Sequence::for_each`](crate::Sequence::for_each) builds a fresh one.

use std::cell::RefCell;

use crate::{Error, Flow, Result};

type Sink<'a, T> = &'a mut (dyn FnMut(T) -> Result<Flow> + 'a);

/// Forwards emitted values to the consumer attached for the current drive.
///
/// # Examples
///
/// ```rust
/// use redrive::Sequence;
///
/// let seq = Sequence::new(|relay| {
///     relay.emit("a")?;
///     relay.emit("b")?;
///     Ok(())
/// });
///
/// let mut seen = Vec::new();
/// seq.for_each(|s| seen.push(s)).unwrap();
/// assert_eq!(seen, ["a", "b"]);
/// ```
pub struct Relay<'a, T> {
    sink: RefCell<Option<Sink<'a, T>>>,
}

impl<'a, T> Relay<'a, T> {
    /// Build a relay attached to `sink` for one drive.
    pub(crate) fn attached(sink: Sink<'a, T>) -> Self {
        Relay {
            sink: RefCell::new(Some(sink)),
        }
    }

    /// Build a relay with no consumer attached.
    ///
    /// Emitting on a detached relay fails with [`Error::Detached`]; this
    /// exists so producer code can be exercised against the misuse path.
    pub fn detached() -> Self {
        Relay {
            sink: RefCell::new(None),
        }
    }

    /// Forward one value to the attached consumer.
    ///
    /// Returns the consumer's [`Flow`] signal unchanged. Producers are
    /// expected to stop emitting and return `Ok(())` once they see
    /// [`Flow::Break`]. Fails with [`Error::Detached`] when no consumer is
    /// attached.
    pub fn emit(&self, value: T) -> Result<Flow> {
        let mut slot = self.sink.borrow_mut();
        match slot.as_mut() {
            Some(sink) => sink(value),
            None => Err(Error::Detached),
        }
    }

    /// Forward every value of `values`, stopping early on [`Flow::Break`].
    ///
    /// Returns the last signal observed, so callers can propagate a `Break`
    /// further upstream.
    pub fn emit_all<I>(&self, values: I) -> Result<Flow>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            if self.emit(value)?.is_break() {
                return Ok(Flow::Break);
            }
        }
        Ok(Flow::Continue)
    }
}

impl<T> std::fmt::Debug for Relay<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let attached = match self.sink.try_borrow() {
            Ok(slot) => slot.is_some(),
            Err(_) => true,
        };
        f.debug_struct("Relay").field("attached", &attached).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_forwards_to_attached_sink() {
        let mut seen = Vec::new();
        let mut sink = |v: i32| {
            seen.push(v);
            Ok(Flow::Continue)
        };
        let relay = Relay::attached(&mut sink);
        assert!(relay.emit(1).unwrap().is_continue());
        assert!(relay.emit(2).unwrap().is_continue());
        drop(relay);
        assert_eq!(seen, [1, 2]);
    }

    #[test]
    fn test_emit_returns_downstream_signal_verbatim() {
        let mut sink = |v: i32| {
            if v > 1 {
                Ok(Flow::Break)
            } else {
                Ok(Flow::Continue)
            }
        };
        let relay = Relay::attached(&mut sink);
        assert!(relay.emit(0).unwrap().is_continue());
        assert!(relay.emit(2).unwrap().is_break());
    }

    #[test]
    fn test_emit_on_detached_relay_is_invalid_state() {
        let relay: Relay<'_, i32> = Relay::detached();
        assert!(matches!(relay.emit(7), Err(Error::Detached)));
    }

    #[test]
    fn test_emit_all_stops_on_break() {
        let mut seen = Vec::new();
        let mut sink = |v: i32| {
            seen.push(v);
            Ok(if v == 2 { Flow::Break } else { Flow::Continue })
        };
        let relay = Relay::attached(&mut sink);
        assert!(relay.emit_all(vec![1, 2, 3, 4]).unwrap().is_break());
        drop(relay);
        assert_eq!(seen, [1, 2]);
    }
}
