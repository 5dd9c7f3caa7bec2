//! Synchronous page fetching over `http`, `https`, `file` and `data` URLs.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable descriptors, headers, responses and options
//! - [`core`] - Pure transformations: parsing, request building, redirect
//!   resolution, cache-control and body decoding
//! - `effects` - I/O behind the [`Connector`] trait, the response reader,
//!   the disk cache and the [`Fetcher`] that ties them together
//!
//! # Key Features
//!
//! - **Hand-written HTTP/1.1**: chunked and length-delimited bodies, gzip
//! - **Bounded redirects**: every hop consumes one unit of a fixed budget
//! - **Disk cache**: `max-age` freshness, per-file atomic writes via `pagefetch-fs`
//! - **`view-source:`**: a flag carried through every redirect hop
//!
//! # Examples
//!
//! ```no_run
//! use pagefetch::{CacheStore, Fetcher, TcpConnector};
//!
//! let fetcher = Fetcher::new(TcpConnector).with_cache(CacheStore::new("cache"));
//! let page = fetcher.fetch("https://example.org/").unwrap();
//! println!("{}", page.text());
//! ```

pub mod core;
pub mod data;
mod effects;
mod error;

pub use self::core::parse;
pub use self::data::{
    CacheEntry, ConnectionMode, DEFAULT_REDIRECT_BUDGET, DataEncoding, DataUrl, FetchOptions, FetchResult, Headers,
    HttpResponse, HttpTarget, Target, UrlDescriptor,
};
pub use self::effects::{CacheError, CacheStore, Connection, Connector, Fetcher, TcpConnector, read_response};
pub use self::error::{FetchError, Result};
