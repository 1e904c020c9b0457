//! Error types for catsync-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed with status code: {status}")]
    Status { status: u16 },

    #[error("request timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    /// Status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
