//! Commonly used imports
//!
//! Use `use redrive::prelude::*;` for quick access to the most common types.

// Core types
pub use crate::{Cursor, Relay, Sequence};

// Producer side
pub use crate::{IterSource, Produce};

// Signals and errors
pub use crate::{ChunkKey, Error, Flow, Result};
