//! The reusable, composable sequence object.
//!
//! A [`Sequence`] binds a producer and nothing else: it holds no iteration
//! position, so it is a factory of drives rather than an iterator. Every call
//! to [`Sequence::for_each`] is an independent, restartable drive; the derived
//! combinators build new sequences whose generator blocks drive the base
//! sequence and re-emit transformed values, and do no work until driven.
//!
//! # Examples
//!
//! ```rust
//! use redrive::Sequence;
//!
//! let words = Sequence::from_values(vec!["cat", "dog", "wombat"]);
//! let lengths = words.map(|w| w.len());
//!
//! assert_eq!(lengths.to_vec().unwrap(), [3, 3, 6]);
//! // A sequence can be redriven any number of times.
//! assert_eq!(lengths.to_vec().unwrap(), [3, 3, 6]);
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::{Cursor, Flow, IterSource, Memo, Produce, Relay, Result};

/// A lazy, redrivable sequence over a push-style producer.
///
/// Cloning is cheap: clones share the producer and stay in lockstep with
/// nothing, since no drive state lives on the wrapper.
pub struct Sequence<T> {
    source: Arc<dyn Produce<T>>,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Sequence {
            source: Arc::clone(&self.source),
        }
    }
}

impl<T> std::fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

impl<T: 'static> Sequence<T> {
    /// Build a sequence from a generator block.
    ///
    /// The block runs once per drive with a fresh [`Relay`], emits through it
    /// with `?` on every `emit`, and returns. Its return value is `Ok(())`
    /// on normal completion; any failure propagates to the driver unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Sequence;
    ///
    /// let fibs = Sequence::new(|relay| {
    ///     let (mut a, mut b) = (0u64, 1u64);
    ///     while a < 100 {
    ///         if relay.emit(a)?.is_break() {
    ///             break;
    ///         }
    ///         let next = a + b;
    ///         a = b;
    ///         b = next;
    ///     }
    ///     Ok(())
    /// });
    ///
    /// assert_eq!(fibs.to_vec().unwrap(), [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89]);
    /// ```
    pub fn new<F>(block: F) -> Self
    where
        F: for<'a> Fn(&Relay<'a, T>) -> Result<()> + Send + Sync + 'static,
    {
        Sequence {
            source: Arc::new(block),
        }
    }

    /// Build a sequence from any [`Produce`] implementation.
    pub fn from_source<P>(producer: P) -> Self
    where
        P: Produce<T> + 'static,
    {
        Sequence {
            source: Arc::new(producer),
        }
    }

    /// Build a sequence that redrives a cloneable iterable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Sequence;
    ///
    /// let seq = Sequence::from_values(1..=3);
    /// assert_eq!(seq.to_vec().unwrap(), [1, 2, 3]);
    /// ```
    pub fn from_values<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    {
        Self::from_source(IterSource::new(items))
    }

    /// Run one full drive, handing each value to `f` in emission order.
    ///
    /// Returns once the producer completes. Each call is an independent
    /// drive; this is the restart-safe entry point.
    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        self.try_for_each(|value| {
            f(value);
            Ok(Flow::Continue)
        })
    }

    /// Run one drive where the consumer can stop or fail it.
    ///
    /// `f` returns [`Flow::Break`] to end the drive early (the drive itself
    /// still returns `Ok(())`), or an error to fail it; the error propagates
    /// out unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::{Flow, Sequence};
    ///
    /// let seq = Sequence::from_values(1..);
    /// let mut seen = Vec::new();
    /// seq.try_for_each(|v| {
    ///     seen.push(v);
    ///     Ok(if v == 3 { Flow::Break } else { Flow::Continue })
    /// })
    /// .unwrap();
    /// assert_eq!(seen, [1, 2, 3]);
    /// ```
    pub fn try_for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T) -> Result<Flow>,
    {
        trace!("drive started");
        let mut halted = false;
        let mut sink = move |value: T| -> Result<Flow> {
            // A producer that ignores Break keeps being told Break.
            if halted {
                return Ok(Flow::Break);
            }
            let flow = f(value)?;
            if flow.is_break() {
                halted = true;
            }
            Ok(flow)
        };
        let relay = Relay::attached(&mut sink);
        self.source.drive(&relay)
    }

    /// Drain one drive into a `Vec`.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        self.for_each(|value| out.push(value))?;
        Ok(out)
    }

    /// Invoke the producer's restart hook.
    ///
    /// No-op for producers that keep no position state between drives.
    pub fn restart(&self) {
        self.source.restart();
    }

    /// Open a pull-mode cursor over this sequence.
    ///
    /// See [`Cursor`] for the `next`/`peek`/`rewind` surface.
    pub fn cursor(&self) -> Cursor<T>
    where
        T: Send,
    {
        Cursor::new(self.clone())
    }

    /// Lazily transform every value.
    ///
    /// No work happens at construction: `transform` runs once per source
    /// value, in order, only while the returned sequence is being driven.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Sequence;
    ///
    /// let squares = Sequence::from_values(1..=4).map(|i| i * i);
    /// assert_eq!(squares.to_vec().unwrap(), [1, 4, 9, 16]);
    /// ```
    pub fn map<U, F>(&self, transform: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let base = self.clone();
        Sequence::new(move |relay| base.try_for_each(|value| relay.emit(transform(value))))
    }

    /// Pair every value with its zero-based position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Sequence;
    ///
    /// let seq = Sequence::from_values(vec!["a", "b", "c"]).with_index();
    /// assert_eq!(seq.to_vec().unwrap(), [("a", 0), ("b", 1), ("c", 2)]);
    /// ```
    pub fn with_index(&self) -> Sequence<(T, usize)> {
        let base = self.clone();
        Sequence::new(move |relay| {
            let mut index = 0usize;
            base.try_for_each(|value| {
                let flow = relay.emit((value, index))?;
                index += 1;
                Ok(flow)
            })
        })
    }

    /// Pair every value with a shared accumulator seeded from `seed`.
    ///
    /// All emissions of one drive share one [`Memo`]; every drive starts from
    /// a fresh clone of the seed. See [`Memo`] for an example.
    pub fn with_memo<M>(&self, seed: M) -> Sequence<(T, Memo<M>)>
    where
        M: Clone + Send + Sync + 'static,
    {
        let base = self.clone();
        Sequence::new(move |relay| {
            let memo = Memo::new(seed.clone());
            base.try_for_each(|value| relay.emit((value, memo.clone())))
        })
    }

    /// Lazily expand every value into zero or more output values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::Sequence;
    ///
    /// let seq = Sequence::from_values(vec![1, 2, 3]).flat_map(|n| vec![n; n]);
    /// assert_eq!(seq.to_vec().unwrap(), [1, 2, 2, 3, 3, 3]);
    /// ```
    pub fn flat_map<U, I, F>(&self, transform: F) -> Sequence<U>
    where
        U: 'static,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        let base = self.clone();
        Sequence::new(move |relay| base.try_for_each(|value| relay.emit_all(transform(value))))
    }
}
