use crate::core::parse;
use crate::data::{Target, UrlDescriptor};
use crate::error::{FetchError, Result};

/// Resolve a `Location` header value against the descriptor that produced it.
///
/// - `/path` keeps the current scheme, host and port;
/// - `//host/path` keeps the current scheme;
/// - anything else is parsed as a complete URL.
///
/// The result inherits `view_source` and the redirect budget from `current`,
/// and must be an `http` or `https` target.
///
/// # Examples
///
/// ```
/// use pagefetch::{parse, core::resolve_redirect};
///
/// let current = parse("http://example.org/old").unwrap();
/// let next = resolve_redirect(&current, "/new").unwrap();
/// assert_eq!(next.to_string(), "http://example.org/new");
/// ```
pub fn resolve_redirect(current: &UrlDescriptor, location: &str) -> Result<UrlDescriptor> {
    let location = location.trim();
    let Target::Http(http) = &current.target else {
        return Err(FetchError::UnsupportedScheme(current.scheme().to_string()));
    };

    let target = if location.starts_with("//") {
        parse(&format!("{}:{}", http.scheme(), location))?.target
    } else if location.starts_with('/') {
        parse(&format!("{}://{}{}", http.scheme(), http.authority(), location))?.target
    } else {
        parse(location)?.target
    };

    let scheme = match &target {
        Target::Http(_) => None,
        Target::File { .. } => Some("file"),
        Target::Data(_) => Some("data"),
    };
    if let Some(scheme) = scheme {
        return Err(FetchError::UnsupportedScheme(format!("redirect to {}", scheme)));
    }

    Ok(UrlDescriptor {
        view_source: current.view_source,
        target,
    }
    .with_redirect_budget(http.redirect_budget))
}
