//! `cache-control` evaluation for the response cache.

use crate::data::{CacheEntry, Headers};

/// Status codes whose responses may be written to the cache.
const STORABLE_STATUSES: [u16; 3] = [200, 301, 404];

/// The `cache-control` directives the cache acts on; others are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub max_age:  Option<i64>,
    pub no_store: bool,
}

impl CacheControl {
    pub fn parse(header: &str) -> Self {
        let mut control = Self::default();

        for directive in header.split(',') {
            let directive = directive.trim().to_ascii_lowercase();

            if directive == "no-store" {
                control.no_store = true;
            } else if let Some(max_age) = directive.strip_prefix("max-age=")
                && let Ok(seconds) = max_age.trim_matches('"').parse::<i64>()
                && seconds >= 0
            {
                control.max_age = Some(seconds);
            }
        }

        control
    }

    pub fn from_headers(headers: &Headers) -> Option<Self> { headers.get("cache-control").map(Self::parse) }
}

/// Whether a response may be written to the cache: a storable status and a
/// `cache-control` header that does not say `no-store`.
pub fn is_storable(status: u16, headers: &Headers) -> bool {
    STORABLE_STATUSES.contains(&status)
        && CacheControl::from_headers(headers).is_some_and(|control| !control.no_store)
}

/// Whether `entry` may be served at unix time `now` without refetching.
///
/// Entries stored without `max-age` are never fresh.
///
/// # Examples
///
/// ```
/// use pagefetch::{CacheEntry, Headers, core::is_fresh};
///
/// let entry = CacheEntry { stored_at: 1_000, max_age: Some(100), headers: Headers::new(), body: vec![] };
/// assert!(is_fresh(&entry, 1_050));
/// assert!(!is_fresh(&entry, 1_150));
/// ```
pub fn is_fresh(entry: &CacheEntry, now: i64) -> bool {
    entry
        .max_age
        .is_some_and(|max_age| now.saturating_sub(entry.stored_at) < max_age)
}
