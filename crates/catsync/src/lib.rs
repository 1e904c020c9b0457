//! Conditional sync of a remote JSON app catalog.
//!
//! [`Syncer`] issues one conditional GET, stores the catalog on first
//! contact, and afterwards only accepts fresh content that is identical to
//! the stored snapshot once both are Unicode-normalized. Any real drift is
//! reported as [`SyncError::Diverged`] and leaves the snapshot untouched.

pub mod cli;
pub mod config;
mod error;
pub mod logging;
mod sync;

pub use config::{ConfigError, ConfigLayer, SyncConfig};
pub use error::{Result, SyncError};
pub use sync::{SyncOutcome, Syncer, compare_files, report_differences};
