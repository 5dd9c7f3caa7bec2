//! I/O for page fetching.
//!
//! Sockets, TLS, the response reader and the disk cache live here; every
//! decision they need is delegated to the pure functions in [`crate::core`].

mod cache;
mod fetcher;
mod reader;
mod transport;

pub use cache::{CacheError, CacheStore};
pub use fetcher::Fetcher;
pub use reader::read_response;
pub use transport::{Connection, Connector, TcpConnector};
