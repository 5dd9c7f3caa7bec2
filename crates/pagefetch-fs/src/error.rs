use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write {path}: {source}")]
    Write {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether the underlying I/O failure was a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        let source = match self {
            Error::Write { source, .. } | Error::Read { source, .. } | Error::CreateDir { source, .. } => source,
        };
        source.kind() == io::ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, Error>;
