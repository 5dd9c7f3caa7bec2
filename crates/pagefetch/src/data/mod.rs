//! Immutable data types for page fetching.
//!
//! Descriptors, headers, responses and options are built once and passed by
//! reference between the pure `core` functions and the effectful `effects`
//! layer. Nothing here performs I/O.

pub mod cache;
pub mod headers;
pub mod options;
pub mod response;
pub mod url;

pub use cache::CacheEntry;
pub use headers::Headers;
pub use options::{ConnectionMode, FetchOptions};
pub use response::{FetchResult, HttpResponse};
pub use url::{DEFAULT_REDIRECT_BUDGET, DataEncoding, DataUrl, HttpTarget, Target, UrlDescriptor};
