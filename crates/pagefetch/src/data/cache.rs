use super::headers::Headers;

/// A cached response body plus the header snapshot it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Unix time, in seconds, when the entry was written.
    pub stored_at: i64,
    /// `max-age` from the stored `cache-control` header.
    pub max_age:   Option<i64>,
    pub headers:   Headers,
    pub body:      Vec<u8>,
}
