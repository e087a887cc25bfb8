//! Pull-mode iteration over a push-style sequence.
//!
//! A [`Cursor`] converts one drive of a [`Sequence`] into `next`/`peek`/
//! `rewind` pull semantics. The producer was never written to pause, so the
//! cursor parks the drive on a dedicated thread blocked on a zero-capacity
//! rendezvous channel: the send inside the drive's callback is the single
//! suspension point, and every `next` is one resume. Control only ever
//! transfers at that handoff; between emissions the producer runs
//! uninterrupted.
//!
//! Dropping a cursor (or rewinding it) drops the receiving end, which fails
//! the parked send; the resulting [`Error::Detached`] unwinds the producer
//! through its normal `?` propagation and the drive thread exits. Teardown
//! needs no explicit close.
//!
//! # Examples
//!
//! ```rust
//! use redrive::Sequence;
//!
//! let seq = Sequence::from_values(vec![10, 20]);
//! let mut cursor = seq.cursor();
//!
//! assert_eq!(cursor.next().unwrap(), 10);
//! assert_eq!(cursor.peek().unwrap(), &20);
//! assert_eq!(cursor.next().unwrap(), 20);
//! assert!(cursor.next().unwrap_err().is_exhausted());
//! // Exhaustion auto-rewinds: the next call starts a fresh pass.
//! assert_eq!(cursor.next().unwrap(), 10);
//! ```

use std::mem;
use std::sync::mpsc;
use std::thread;

use tracing::trace;

use crate::{Error, Flow, Result, Sequence};

/// External iterator over a [`Sequence`], with suspend/resume pull semantics.
///
/// A cursor owns at most one live drive. All operations take `&mut self`, so
/// a single cursor cannot be shared between concurrent callers; independent
/// cursors over the same sequence run independent drives.
pub struct Cursor<T> {
    sequence: Sequence<T>,
    state: CursorState<T>,
    peeked: Option<T>,
}

enum CursorState<T> {
    /// No drive yet; the next pull starts one.
    Unstarted,
    /// A drive is parked, waiting to be resumed.
    Live(DriveHandle<T>),
    /// The last drive failed; exhaustion is reported once before restarting.
    Drained,
}

struct DriveHandle<T> {
    events: mpsc::Receiver<Event<T>>,
}

enum Event<T> {
    Value(T),
    End,
    Failed(Error),
}

impl<T: Send + 'static> Cursor<T> {
    pub(crate) fn new(sequence: Sequence<T>) -> Self {
        Cursor {
            sequence,
            state: CursorState::Unstarted,
            peeked: None,
        }
    }

    /// Pull the next value, resuming the suspended drive.
    ///
    /// Starts a drive on first use. When the drive completes, the cursor
    /// rewinds itself and reports [`Error::Exhausted`] once; the following
    /// call begins a fresh pass and returns the first value again. A producer
    /// failure propagates out of the call that resumed it.
    pub fn next(&mut self) -> Result<T> {
        if let Some(value) = self.peeked.take() {
            return Ok(value);
        }
        self.advance()
    }

    /// Look at the next value without consuming it.
    ///
    /// Repeated peeks return the same value and do not advance the cursor;
    /// the following [`next`](Cursor::next) returns it without resuming the
    /// drive. Signals exhaustion exactly like `next`.
    pub fn peek(&mut self) -> Result<&T> {
        let value = match self.peeked.take() {
            Some(value) => value,
            None => self.advance()?,
        };
        Ok(self.peeked.insert(value))
    }

    /// Discard the in-progress drive and return to the start.
    ///
    /// Clears the peek slot, drops any suspended drive (its thread unwinds
    /// and exits), and invokes the producer's restart hook. Never fails.
    pub fn rewind(&mut self) {
        trace!("cursor rewind");
        self.peeked = None;
        self.state = CursorState::Unstarted;
        self.sequence.restart();
    }

    /// Iterate the remaining values as `Result`s, ending at exhaustion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Sequence;
    ///
    /// let seq = Sequence::from_values(vec![1, 2, 3]);
    /// let mut cursor = seq.cursor();
    /// cursor.next().unwrap();
    ///
    /// let rest: Vec<_> = cursor.iter().collect::<Result<_, _>>().unwrap();
    /// assert_eq!(rest, [2, 3]);
    /// ```
    pub fn iter(&mut self) -> CursorIter<'_, T> {
        CursorIter { cursor: self }
    }

    fn advance(&mut self) -> Result<T> {
        match mem::replace(&mut self.state, CursorState::Drained) {
            CursorState::Unstarted => {
                let handle = start_drive(self.sequence.clone())?;
                self.resume(handle)
            }
            CursorState::Live(handle) => self.resume(handle),
            CursorState::Drained => {
                // Report the end of the failed pass once, ready for a fresh one.
                self.rewind();
                Err(Error::Exhausted)
            }
        }
    }

    fn resume(&mut self, handle: DriveHandle<T>) -> Result<T> {
        match handle.events.recv() {
            Ok(Event::Value(value)) => {
                self.state = CursorState::Live(handle);
                Ok(value)
            }
            Ok(Event::End) => {
                trace!("cursor drive exhausted");
                self.state = CursorState::Unstarted;
                self.sequence.restart();
                Err(Error::Exhausted)
            }
            // State stays Drained: the failed drive is never resumed again.
            Ok(Event::Failed(error)) => Err(error),
            Err(mpsc::RecvError) => Err(Error::Detached),
        }
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            CursorState::Unstarted => "unstarted",
            CursorState::Live(_) => "live",
            CursorState::Drained => "drained",
        };
        f.debug_struct("Cursor")
            .field("state", &state)
            .field("peeked", &self.peeked.is_some())
            .finish()
    }
}

/// Spawn the drive thread and hand back its event channel.
///
/// The zero-capacity channel makes every send a rendezvous: the thread parks
/// on each emitted value until the cursor receives it.
fn start_drive<T: Send + 'static>(sequence: Sequence<T>) -> Result<DriveHandle<T>> {
    let (events, receiver) = mpsc::sync_channel(0);
    trace!("cursor drive thread starting");
    let _detached = thread::Builder::new()
        .name("redrive-cursor".into())
        .spawn(move || {
            let outcome = sequence.try_for_each(|value| match events.send(Event::Value(value)) {
                Ok(()) => Ok(Flow::Continue),
                Err(mpsc::SendError(_)) => Err(Error::Detached),
            });
            match outcome {
                Ok(()) => {
                    let _ = events.send(Event::End);
                }
                Err(Error::Detached) => {
                    // The cursor went away; nobody is listening.
                    trace!("cursor drive abandoned");
                }
                Err(error) => {
                    let _ = events.send(Event::Failed(error));
                }
            }
        })
        .map_err(Error::source_err)?;
    Ok(DriveHandle { events: receiver })
}

/// Iterator adapter over a borrowed cursor.
///
/// Yields `Ok` per value and ends (`None`) at exhaustion; a producer failure
/// is yielded as one `Err` before the iterator ends.
pub struct CursorIter<'a, T> {
    cursor: &'a mut Cursor<T>,
}

impl<T: Send + 'static> Iterator for CursorIter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor.next() {
            Ok(value) => Some(Ok(value)),
            Err(Error::Exhausted) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn drain<T: Send + 'static>(cursor: &mut Cursor<T>) -> Vec<T> {
        let mut out = Vec::new();
        loop {
            match cursor.next() {
                Ok(value) => out.push(value),
                Err(error) => {
                    assert!(error.is_exhausted());
                    return out;
                }
            }
        }
    }

    #[test]
    fn test_pull_matches_push_order() {
        let seq = Sequence::from_values(vec![1, 2, 3, 4]);
        let mut pushed = Vec::new();
        seq.for_each(|v| pushed.push(v)).unwrap();
        let mut cursor = seq.cursor();
        assert_eq!(drain(&mut cursor), pushed);
    }

    #[test]
    fn test_next_neither_skips_nor_duplicates() {
        let seq = Sequence::from_values(0..100);
        let mut cursor = seq.cursor();
        assert_eq!(drain(&mut cursor), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_peek_is_idempotent_and_does_not_advance() {
        let seq = Sequence::from_values(vec!["a", "b"]);
        let mut cursor = seq.cursor();
        assert_eq!(cursor.peek().unwrap(), &"a");
        assert_eq!(cursor.peek().unwrap(), &"a");
        assert_eq!(cursor.next().unwrap(), "a");
        assert_eq!(cursor.next().unwrap(), "b");
    }

    #[test]
    fn test_exhaustion_auto_rewinds_for_a_fresh_pass() {
        let seq = Sequence::from_values(vec![1, 2]);
        let mut cursor = seq.cursor();
        assert_eq!(drain(&mut cursor), [1, 2]);
        // No explicit rewind: the next pull starts over.
        assert_eq!(cursor.next().unwrap(), 1);
    }

    #[test]
    fn test_rewind_restarts_mid_pass() {
        let seq = Sequence::from_values(vec![1, 2, 3]);
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next().unwrap(), 1);
        assert_eq!(cursor.next().unwrap(), 2);
        cursor.rewind();
        assert_eq!(drain(&mut cursor), [1, 2, 3]);
    }

    #[test]
    fn test_rewind_clears_peeked_value() {
        let seq = Sequence::from_values(vec![1, 2]);
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next().unwrap(), 1);
        assert_eq!(cursor.peek().unwrap(), &2);
        cursor.rewind();
        assert_eq!(cursor.next().unwrap(), 1);
    }

    #[test]
    fn test_rewind_invokes_the_restart_hook() {
        use crate::{Produce, Relay};

        struct Hooked {
            restarts: Arc<AtomicUsize>,
        }

        impl Produce<i32> for Hooked {
            fn drive(&self, relay: &Relay<'_, i32>) -> Result<()> {
                relay.emit(1)?;
                Ok(())
            }

            fn restart(&self) {
                self.restarts.fetch_add(1, Ordering::SeqCst);
            }
        }

        let restarts = Arc::new(AtomicUsize::new(0));
        let seq = Sequence::from_source(Hooked {
            restarts: Arc::clone(&restarts),
        });
        let mut cursor = seq.cursor();
        cursor.next().unwrap();
        cursor.rewind();
        assert_eq!(restarts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_producer_failure_propagates_then_exhausts_then_restarts() {
        let seq: Sequence<i32> = Sequence::new(|relay| {
            relay.emit(1)?;
            Err(Error::source_err("tape unreadable"))
        });
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next().unwrap(), 1);
        let failure = cursor.next().unwrap_err();
        assert_eq!(failure.to_string(), "tape unreadable");
        // The failed drive is never resumed; the pass ends once, then restarts.
        assert!(cursor.next().unwrap_err().is_exhausted());
        assert_eq!(cursor.next().unwrap(), 1);
    }

    #[test]
    fn test_independent_cursors_do_not_interfere() {
        let seq = Sequence::from_values(vec![1, 2, 3]);
        let mut a = seq.cursor();
        let mut b = seq.cursor();
        assert_eq!(a.next().unwrap(), 1);
        assert_eq!(b.next().unwrap(), 1);
        assert_eq!(a.next().unwrap(), 2);
        assert_eq!(b.next().unwrap(), 2);
        assert_eq!(a.next().unwrap(), 3);
        assert_eq!(b.next().unwrap(), 3);
    }

    #[test]
    fn test_cursor_over_infinite_producer() {
        let seq = Sequence::from_values(0u64..);
        let mut cursor = seq.cursor();
        for expected in 0..5 {
            assert_eq!(cursor.next().unwrap(), expected);
        }
        // Dropping mid-drive must tear the parked thread down cleanly.
    }

    #[test]
    fn test_abandoned_cursor_unparks_the_producer() {
        let reached_end = Arc::new(AtomicUsize::new(0));
        let witness = Arc::clone(&reached_end);
        let seq = Sequence::new(move |relay| {
            for n in 0..u64::MAX {
                relay.emit(n)?;
            }
            witness.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next().unwrap(), 0);
        drop(cursor);
        // Give the unwinding thread a moment; it must not run to completion.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(reached_end.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cursor_over_derived_sequences() {
        let seq = Sequence::from_values(vec![1, 2, 3]).map(|v| v * 10).with_index();
        let mut cursor = seq.cursor();
        assert_eq!(cursor.next().unwrap(), (10, 0));
        assert_eq!(cursor.next().unwrap(), (20, 1));
        assert_eq!(cursor.next().unwrap(), (30, 2));
        assert!(cursor.next().unwrap_err().is_exhausted());
    }

    #[test]
    fn test_iter_adapter_ends_at_exhaustion() {
        let seq = Sequence::from_values(vec![5, 6]);
        let mut cursor = seq.cursor();
        let all: Vec<_> = cursor.iter().map(Result::unwrap).collect();
        assert_eq!(all, [5, 6]);
        // The adapter consumed the exhaustion signal, so a fresh pass follows.
        assert_eq!(cursor.next().unwrap(), 5);
    }

    proptest! {
        #[test]
        fn prop_pull_equals_push(values in proptest::collection::vec(any::<i32>(), 0..32)) {
            let seq = Sequence::from_values(values.clone());
            let mut pushed = Vec::new();
            seq.for_each(|v| pushed.push(v)).unwrap();
            let mut cursor = seq.cursor();
            prop_assert_eq!(&drain(&mut cursor), &pushed);
            prop_assert_eq!(&pushed, &values);
        }

        #[test]
        fn prop_rewind_reproduces_the_full_sequence(
            values in proptest::collection::vec(any::<u8>(), 1..24),
            taken in 0usize..24,
        ) {
            let seq = Sequence::from_values(values.clone());
            let mut cursor = seq.cursor();
            for _ in 0..taken.min(values.len()) {
                cursor.next().unwrap();
            }
            cursor.rewind();
            prop_assert_eq!(&drain(&mut cursor), &values);
        }
    }
}
