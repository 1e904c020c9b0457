use std::path::PathBuf;

use catsync_diff::Difference;
use catsync_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("the pulled response is different from the existing JSON ({} difference(s))", .0.len())]
    Diverged(Vec<Difference>),

    #[error("invalid JSON in {what}: {source}")]
    Json {
        what:   &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),

    #[error(transparent)]
    Store(#[from] catsync_fs::Error),
}

impl SyncError {
    /// Differences behind a [`SyncError::Diverged`], empty for every other variant.
    pub fn differences(&self) -> &[Difference] {
        match self {
            SyncError::Diverged(d) => d,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
