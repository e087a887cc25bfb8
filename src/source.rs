//! Producer adapters: the push side of the engine.
//!
//! Anything that can be driven, given a relay, to emit zero or more values in
//! order and then return implements [`Produce`]. The two built-in forms are
//! generator-block closures (any `Fn(&Relay<T>) -> Result<()>`) and
//! [`IterSource`], which redrives a cloneable iterable. The original notion of
//! binding a producer by a late-resolved operation name is rendered here as a
//! stored callable captured at construction.

use tracing::trace;

use crate::{Relay, Result};

/// A push-style producer that can be redriven any number of times.
///
/// One call to [`drive`](Produce::drive) is one complete push iteration:
/// emit each value through the relay with `?` on every `emit`, then return.
/// The contract, in full:
///
/// - propagate any failure unchanged (never catch and rewrap);
/// - stop emitting and return `Ok(())` after the relay reports
///   [`Flow::Break`](crate::Flow::Break);
/// - tolerate being driven again from scratch; each drive is independent.
///
/// A producer that never terminates is allowed; the sequences built from it
/// simply never terminate either.
///
/// # Examples
///
/// A producer over external state, with a restart hook:
///
/// ```rust
/// use redrive::{Produce, Relay, Result, Sequence};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct Countdown {
///     from: usize,
///     restarts: AtomicUsize,
/// }
///
/// impl Produce<usize> for Countdown {
///     fn drive(&self, relay: &Relay<'_, usize>) -> Result<()> {
///         for n in (1..=self.from).rev() {
///             if relay.emit(n)?.is_break() {
///                 break;
///             }
///         }
///         Ok(())
///     }
///
///     fn restart(&self) {
///         self.restarts.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let seq = Sequence::from_source(Countdown { from: 3, restarts: AtomicUsize::new(0) });
/// assert_eq!(seq.to_vec().unwrap(), [3, 2, 1]);
/// ```
pub trait Produce<T>: Send + Sync {
    /// Run one complete push iteration, emitting through `relay`.
    fn drive(&self, relay: &Relay<'_, T>) -> Result<()>;

    /// Restart hook invoked by [`Cursor::rewind`](crate::Cursor::rewind).
    ///
    /// Most producers keep no position state between drives and can leave
    /// this as the default no-op; producers wrapping an external resource
    /// (a file handle, a connection) override it to reset that resource.
    fn restart(&self) {}
}

/// Generator-block form: any suitable closure is a producer.
impl<T, F> Produce<T> for F
where
    F: for<'a> Fn(&Relay<'a, T>) -> Result<()> + Send + Sync,
{
    fn drive(&self, relay: &Relay<'_, T>) -> Result<()> {
        self(relay)
    }
}

/// Producer over any cloneable iterable.
///
/// Each drive clones the iterable and walks a fresh iterator, which is what
/// makes the resulting sequences restart-independent.
///
/// # Examples
///
/// ```rust
/// use redrive::{IterSource, Sequence};
///
/// let seq = Sequence::from_source(IterSource::new(0..4));
/// assert_eq!(seq.to_vec().unwrap(), [0, 1, 2, 3]);
/// assert_eq!(seq.to_vec().unwrap(), [0, 1, 2, 3]);
/// ```
pub struct IterSource<I> {
    items: I,
}

impl<I> IterSource<I> {
    /// Wrap a cloneable iterable.
    pub fn new(items: I) -> Self {
        IterSource { items }
    }
}

impl<T, I> Produce<T> for IterSource<I>
where
    I: IntoIterator<Item = T> + Clone + Send + Sync,
{
    fn drive(&self, relay: &Relay<'_, T>) -> Result<()> {
        trace!("iter source drive started");
        for value in self.items.clone() {
            if relay.emit(value)?.is_break() {
                break;
            }
        }
        Ok(())
    }
}
