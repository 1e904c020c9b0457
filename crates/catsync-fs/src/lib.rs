//! Path-keyed byte storage with atomic replacement.
//!
//! The [`ByteStore`] trait is the only persistence seam the sync workflow
//! depends on. [`FsStore`] writes through [`atomic_write`] so an interrupted
//! run never leaves a truncated file behind.

mod error;
mod rw;
mod store;

pub use error::{Error, Result};
pub use rw::{Options, atomic_read, atomic_write};
pub use store::{ByteStore, FsStore, MemoryStore};
