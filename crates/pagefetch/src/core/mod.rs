//! Pure transformations for page fetching.
//!
//! Nothing in this module touches sockets or the filesystem: URL parsing,
//! request serialization, redirect resolution, cache-control evaluation and
//! body decoding all take values and return values.

mod cache_control;
mod data_url;
mod decode;
mod parse;
mod redirect;
mod request;
mod validation;

pub use cache_control::{CacheControl, is_fresh, is_storable};
pub use data_url::decode_data_url;
pub use decode::{ContentEncoding, decode_body};
pub use parse::parse;
pub use redirect::resolve_redirect;
pub use request::{build_request, request_headers};
pub use validation::is_redirect;
