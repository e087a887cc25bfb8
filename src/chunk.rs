//! Segmentation: grouping adjacent equal-classifier-key values into runs.
//!
//! [`Sequence::chunk`] classifies each value and emits `(key, run)` pairs for
//! every maximal run of adjacent values whose keys compare equal. This is
//! stable "chunk while the classifier result repeats" grouping, not global
//! grouping: the same key can open a new run later in the sequence.

use std::mem;

use crate::{Flow, Relay, Result, Sequence};

/// Verdict of a chunk classifier for one value.
///
/// The marker variants replace the original reserved-symbol protocol with
/// types, which also makes an unrecognized marker impossible to express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKey<K> {
    /// An ordinary key: the value joins the current run if the key matches,
    /// otherwise it opens a new run.
    Key(K),
    /// Flush the current run and drop this value entirely.
    Separator,
    /// Flush the current run, then emit this value as a run of its own.
    Singleton,
}

impl<K> ChunkKey<K> {
    /// Returns `true` for an ordinary key.
    #[inline]
    pub const fn is_key(&self) -> bool {
        matches!(self, ChunkKey::Key(_))
    }
}

/// Pending run plus the key that opened it.
///
/// Reset on every key change, separator, or singleton; flushed to the output
/// on every reset and at end of input if non-empty.
struct ChunkState<K, T> {
    previous: Option<K>,
    run: Vec<T>,
}

impl<K: PartialEq, T> ChunkState<K, T> {
    fn new() -> Self {
        ChunkState {
            previous: None,
            run: Vec::new(),
        }
    }

    fn flush(&mut self, relay: &Relay<'_, (ChunkKey<K>, Vec<T>)>) -> Result<Flow> {
        if self.run.is_empty() {
            self.previous = None;
            return Ok(Flow::Continue);
        }
        let values = mem::take(&mut self.run);
        match self.previous.take() {
            Some(key) => relay.emit((ChunkKey::Key(key), values)),
            None => Ok(Flow::Continue),
        }
    }

    fn observe(
        &mut self,
        key: ChunkKey<K>,
        value: T,
        relay: &Relay<'_, (ChunkKey<K>, Vec<T>)>,
    ) -> Result<Flow> {
        match key {
            ChunkKey::Separator => self.flush(relay),
            ChunkKey::Singleton => {
                if self.flush(relay)?.is_break() {
                    return Ok(Flow::Break);
                }
                relay.emit((ChunkKey::Singleton, vec![value]))
            }
            ChunkKey::Key(key) => {
                let same_run = self.previous.as_ref().map_or(true, |prev| *prev == key);
                if !same_run && self.flush(relay)?.is_break() {
                    return Ok(Flow::Break);
                }
                self.run.push(value);
                self.previous = Some(key);
                Ok(Flow::Continue)
            }
        }
    }
}

impl<T: 'static> Sequence<T> {
    /// Group adjacent values whose classifier keys compare equal.
    ///
    /// Emits one `(ChunkKey::Key(k), values)` pair per maximal run; see
    /// [`ChunkKey`] for the separator and singleton markers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redrive::{ChunkKey, Sequence};
    ///
    /// let runs = Sequence::from_values(vec![1, 1, 2, 2, 3, 1, 1])
    ///     .chunk(|v| ChunkKey::Key(*v));
    ///
    /// assert_eq!(
    ///     runs.to_vec().unwrap(),
    ///     [
    ///         (ChunkKey::Key(1), vec![1, 1]),
    ///         (ChunkKey::Key(2), vec![2, 2]),
    ///         (ChunkKey::Key(3), vec![3]),
    ///         (ChunkKey::Key(1), vec![1, 1]),
    ///     ]
    /// );
    /// ```
    pub fn chunk<K, F>(&self, classify: F) -> Sequence<(ChunkKey<K>, Vec<T>)>
    where
        K: PartialEq + 'static,
        F: Fn(&T) -> ChunkKey<K> + Send + Sync + 'static,
    {
        let base = self.clone();
        Sequence::new(move |relay| {
            let mut state = ChunkState::new();
            base.try_for_each(|value| state.observe(classify(&value), value, relay))?;
            state.flush(relay)?;
            Ok(())
        })
    }

    /// [`chunk`](Sequence::chunk) with per-call classifier state.
    ///
    /// `seed` is cloned fresh for every classification call, so the
    /// classifier can scribble on it without one value's classification
    /// leaking into the next.
    pub fn chunk_with_state<K, S, F>(&self, seed: S, classify: F) -> Sequence<(ChunkKey<K>, Vec<T>)>
    where
        K: PartialEq + 'static,
        S: Clone + Send + Sync + 'static,
        F: Fn(&T, S) -> ChunkKey<K> + Send + Sync + 'static,
    {
        self.chunk(move |value| classify(value, seed.clone()))
    }
}
