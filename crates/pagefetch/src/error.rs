//! Error types for pagefetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host:   String,
        port:   u16,
        #[source]
        source: io::Error,
    },

    #[error("TLS error for {host}: {reason}")]
    Tls { host: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    #[error("malformed header: {0:?}")]
    MalformedHeader(String),

    #[error("malformed chunk: {0:?}")]
    MalformedChunk(String),

    #[error("truncated body: expected {expected} bytes, got {actual}")]
    TruncatedBody { expected: usize, actual: usize },

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("failed to decompress body: {0}")]
    Decompress(#[source] io::Error),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("redirect response {status} has no location header")]
    MissingLocation { status: u16 },

    #[error("unsupported data URL type: {0}")]
    UnsupportedDataType(String),

    #[error("invalid data URL payload: {0}")]
    InvalidDataPayload(String),

    #[error("failed to read {path}: {source}")]
    File {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
