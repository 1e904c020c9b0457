use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} has no parent directory", path.display())]
    NoParent { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
