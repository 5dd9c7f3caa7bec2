//! URL string to [`UrlDescriptor`].

use crate::data::{DEFAULT_REDIRECT_BUDGET, DataEncoding, DataUrl, HttpTarget, Target, UrlDescriptor};
use crate::error::{FetchError, Result};

const VIEW_SOURCE: &str = "view-source";

/// Parse a URL string into a descriptor.
///
/// Accepts `http`, `https`, `file` and `data` URLs, optionally prefixed once
/// by `view-source:`. Backslashes are treated as forward slashes.
///
/// # Examples
///
/// ```
/// use pagefetch::{Target, parse};
///
/// let desc = parse("view-source:http://example.org:8080/a/b").unwrap();
/// assert!(desc.view_source);
/// let Target::Http(http) = desc.target else { unreachable!() };
/// assert_eq!((http.host.as_str(), http.port, http.path.as_str()), ("example.org", 8080, "/a/b"));
/// ```
pub fn parse(raw: &str) -> Result<UrlDescriptor> {
    if raw.contains(['\r', '\n']) {
        return Err(FetchError::MalformedUrl(format!("{:?} contains a line break", raw)));
    }

    let normalized = raw.trim().replace('\\', "/");

    let (scheme, rest) = split_scheme(&normalized)?;
    let (view_source, scheme, rest) = if scheme == VIEW_SOURCE {
        let (scheme, rest) = split_scheme(rest)?;
        (true, scheme, rest)
    } else {
        (false, scheme, rest)
    };

    let target = match scheme.as_str() {
        "http" => Target::Http(parse_http(rest, false)?),
        "https" => Target::Http(parse_http(rest, true)?),
        "file" => Target::File {
            path: parse_file(rest)?,
        },
        "data" => Target::Data(parse_data(rest)?),
        other => return Err(FetchError::UnsupportedScheme(other.to_string())),
    };

    Ok(UrlDescriptor { view_source, target })
}

fn split_scheme(input: &str) -> Result<(String, &str)> {
    let (scheme, rest) = input
        .split_once(':')
        .ok_or_else(|| FetchError::MalformedUrl(format!("{:?} has no scheme", input)))?;
    if scheme.is_empty() {
        return Err(FetchError::MalformedUrl(format!("{:?} has an empty scheme", input)));
    }
    Ok((scheme.to_ascii_lowercase(), rest))
}

/// Strip a leading `//` and split into authority and a `/`-rooted path.
fn split_authority(rest: &str) -> (&str, String) {
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    match rest.find(['/', '?', '#']) {
        Some(idx) if rest[idx..].starts_with('/') => (&rest[..idx], rest[idx..].to_string()),
        Some(idx) => (&rest[..idx], format!("/{}", &rest[idx..])),
        None => (rest, "/".to_string()),
    }
}

fn parse_http(rest: &str, secure: bool) -> Result<HttpTarget> {
    let (authority, mut path) = split_authority(rest);

    // Fragments never go on the wire.
    if let Some(idx) = path.find('#') {
        path.truncate(idx);
        if path.is_empty() {
            path.push('/');
        }
    }

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| FetchError::MalformedUrl(format!("invalid port {:?}", port)))?;
            (host, port)
        }
        None => (authority, HttpTarget::default_port(secure)),
    };

    if host.is_empty() {
        return Err(FetchError::MalformedUrl("missing host".to_string()));
    }

    Ok(HttpTarget {
        host: host.to_ascii_lowercase(),
        port,
        path,
        secure,
        redirect_budget: DEFAULT_REDIRECT_BUDGET,
    })
}

fn parse_file(rest: &str) -> Result<String> {
    let (authority, path) = split_authority(rest);
    if !authority.is_empty() && !authority.eq_ignore_ascii_case("localhost") {
        return Err(FetchError::MalformedUrl(format!(
            "file URL names remote host {:?}",
            authority
        )));
    }
    Ok(path)
}

fn parse_data(rest: &str) -> Result<DataUrl> {
    let (type_spec, payload) = rest
        .split_once(',')
        .ok_or_else(|| FetchError::MalformedUrl("data URL has no ',' before its payload".to_string()))?;

    let (mime, params) = type_spec.split_once(';').unwrap_or((type_spec, ""));
    let (media_type, subtype) = match mime.split_once('/') {
        Some((media, subtype)) => (media, Some(subtype.trim().to_ascii_lowercase())),
        None => (mime, None),
    };

    let encoding = if params.split(';').any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        DataEncoding::Base64
    } else {
        DataEncoding::Identity
    };

    Ok(DataUrl {
        media_type: media_type.trim().to_ascii_lowercase(),
        subtype,
        encoding,
        payload: payload.to_string(),
    })
}
