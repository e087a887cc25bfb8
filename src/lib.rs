//! # Redrive: Lazy Sequences With Dual-Mode Iteration
//!
//! Turn any push-style producer (a routine that emits values by invoking a
//! callback until exhausted) into a reusable, composable [`Sequence`], then
//! consume it either way:
//!
//! - **Push**: [`Sequence::for_each`] runs one full drive of the producer.
//! - **Pull**: [`Sequence::cursor`] gives an external [`Cursor`] with
//!   `next`/`peek`/`rewind`, suspending the producer between values even
//!   though it was never written to pause.
//!
//! ## Core Types
//!
//! - **[`Sequence<T>`]**: the reusable wrapper; a factory of independent,
//!   restartable drives.
//! - **[`Relay<T>`]**: the conduit a generator block emits through; its
//!   `emit` is the single point where control transfers downstream.
//! - **[`Cursor<T>`]**: suspend/resume pull iteration over a sequence.
//! - **[`Produce<T>`]**: the producer contract, implemented by generator
//!   blocks and by [`IterSource`].
//!
//! ## Example
//!
//! ```rust
//! use redrive::Sequence;
//!
//! // A generator block is a producer: emit values, then return.
//! let seq = Sequence::new(|relay| {
//!     for word in ["push", "or", "pull"] {
//!         relay.emit(word)?;
//!     }
//!     Ok(())
//! });
//!
//! // Push-mode: drive the whole sequence.
//! let mut collected = Vec::new();
//! seq.for_each(|w| collected.push(w))?;
//! assert_eq!(collected, ["push", "or", "pull"]);
//!
//! // Pull-mode: the same producer, one value at a time.
//! let mut cursor = seq.cursor();
//! assert_eq!(cursor.next()?, "push");
//! assert_eq!(cursor.peek()?, &"or");
//! # Ok::<(), redrive::Error>(())
//! ```
//!
//! ## Derived Sequences
//!
//! [`map`](Sequence::map), [`with_index`](Sequence::with_index),
//! [`with_memo`](Sequence::with_memo), [`flat_map`](Sequence::flat_map), and
//! [`chunk`](Sequence::chunk) each build a new lazy `Sequence` that drives
//! the base sequence and re-emits transformed values; nothing runs until the
//! derived sequence is itself driven.

mod chunk;
mod cursor;
mod error;
mod flow;
mod memo;
mod relay;
mod sequence;
mod source;

pub mod prelude;

pub use chunk::ChunkKey;
pub use cursor::{Cursor, CursorIter};
pub use error::{Error, Result};
pub use flow::Flow;
pub use memo::Memo;
pub use relay::Relay;
pub use sequence::Sequence;
pub use source::{IterSource, Produce};
