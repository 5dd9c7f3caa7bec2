//! HTTP/1.1 request serialization.

use crate::data::{ConnectionMode, FetchOptions, HttpTarget};
use crate::error::{FetchError, Result};

/// Header set sent with every request to `target`, in wire order.
pub fn request_headers(target: &HttpTarget, options: &FetchOptions) -> Vec<(String, String)> {
    let mut headers = vec![
        ("Host".to_string(), target.authority()),
        ("Connection".to_string(), options.connection.to_string()),
    ];
    if options.connection == ConnectionMode::KeepAlive {
        headers.push((
            "Keep-Alive".to_string(),
            format!("timeout={}", options.keep_alive.as_secs()),
        ));
    }
    headers.push(("User-Agent".to_string(), options.user_agent.clone()));
    headers.push(("Accept-Encoding".to_string(), "gzip".to_string()));
    headers.extend(options.headers.iter().cloned());
    headers
}

/// Serialize a `GET` request for `path` with `headers` in the given order.
///
/// Values are interpolated literally, so line breaks anywhere are rejected.
///
/// # Examples
///
/// ```
/// use pagefetch::core::build_request;
///
/// let headers = vec![("Host".to_string(), "example.org".to_string())];
/// let request = build_request("/", &headers).unwrap();
/// assert_eq!(request, b"GET / HTTP/1.1\r\nHost: example.org\r\n\r\n");
/// ```
pub fn build_request(path: &str, headers: &[(String, String)]) -> Result<Vec<u8>> {
    check_line("request path", path)?;

    let mut request = format!("GET {} HTTP/1.1\r\n", path);
    for (name, value) in headers {
        check_line("header name", name)?;
        check_line("header value", value)?;
        if name.is_empty() || name.contains(':') {
            return Err(FetchError::InvalidRequest(format!("invalid header name {:?}", name)));
        }
        request.push_str(name);
        request.push_str(": ");
        request.push_str(value);
        request.push_str("\r\n");
    }
    request.push_str("\r\n");

    Ok(request.into_bytes())
}

fn check_line(what: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n']) {
        return Err(FetchError::InvalidRequest(format!("{} {:?} contains a line break", what, value)));
    }
    Ok(())
}
