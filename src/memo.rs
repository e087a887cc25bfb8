//! Shared accumulator handle for [`Sequence::with_memo`](crate::Sequence::with_memo).

use std::sync::{Arc, Mutex, PoisonError};

/// A cloneable handle to one mutable accumulator.
///
/// Every value emitted by a single `with_memo` drive carries a handle to the
/// same accumulator, so a consumer can fold into it as values arrive and read
/// the result afterwards. Each drive gets a fresh accumulator seeded from the
/// seed value, which keeps redrives independent of one another.
///
/// # Examples
///
/// ```rust
/// use redrive::Sequence;
///
/// let seq = Sequence::from_values(vec![1, 2, 3]).with_memo(0i64);
/// let mut last = None;
/// seq.for_each(|(value, memo)| {
///     memo.update(|sum| *sum += value);
///     last = Some(memo);
/// })
/// .unwrap();
/// assert_eq!(last.unwrap().get(), 6);
/// ```
pub struct Memo<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> Clone for Memo<M> {
    fn clone(&self) -> Self {
        Memo {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> Memo<M> {
    /// Start a fresh accumulator.
    pub fn new(seed: M) -> Self {
        Memo {
            inner: Arc::new(Mutex::new(seed)),
        }
    }

    /// Run `f` with exclusive access to the accumulator.
    pub fn update<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Replace the accumulator wholesale.
    pub fn set(&self, value: M) {
        self.update(|slot| *slot = value);
    }

    /// Snapshot the current accumulator value.
    pub fn get(&self) -> M
    where
        M: Clone,
    {
        self.update(|slot| slot.clone())
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for Memo<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.update(|slot| f.debug_tuple("Memo").field(&*slot).finish())
    }
}
