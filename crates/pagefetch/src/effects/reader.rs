//! HTTP/1.1 response parsing over a buffered stream.

use std::io::{BufRead, Read};

use tracing::debug;

use crate::core::{ContentEncoding, decode_body};
use crate::data::{Headers, HttpResponse};
use crate::error::{FetchError, Result};

/// Read exactly one HTTP message from `reader`.
///
/// The body is de-framed (chunked, `content-length` or close-delimited) and
/// its `content-encoding` removed before returning.
///
/// # Examples
///
/// ```
/// use pagefetch::read_response;
///
/// let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
/// let response = read_response(&raw[..]).unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(response.body, b"hello");
/// ```
pub fn read_response<R: BufRead>(mut reader: R) -> Result<HttpResponse> {
    let (status, reason) = read_status_line(&mut reader)?;
    let headers = read_headers(&mut reader)?;
    debug!(status, headers = headers.len(), "response head read");

    let body = if has_no_body(status) {
        debug!(status, "status carries no body");
        Vec::new()
    } else {
        let body = read_body(&mut reader, &headers)?;
        let encoding = ContentEncoding::from_header(headers.get("content-encoding"))?;
        decode_body(encoding, body)?
    };

    Ok(HttpResponse {
        status,
        reason,
        headers,
        body,
    })
}

/// `1xx`, `204` and `304` responses end with their header block.
fn has_no_body(status: u16) -> bool { (100..200).contains(&status) || status == 204 || status == 304 }

fn is_digits(s: &str) -> bool { !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) }

fn is_hex_digits(s: &str) -> bool { !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit()) }

/// One line without its trailing CRLF, or `None` at EOF.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with(b"\n") {
        line.pop();
        if line.ends_with(b"\r") {
            line.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

fn read_status_line<R: BufRead>(reader: &mut R) -> Result<(u16, String)> {
    let line = read_line(reader)?.ok_or_else(|| FetchError::MalformedStatusLine(String::new()))?;

    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    let code = parts.next().unwrap_or_default();
    let reason = parts.next().unwrap_or_default();

    if !version.starts_with("HTTP/") || code.len() != 3 || !is_digits(code) {
        return Err(FetchError::MalformedStatusLine(line.clone()));
    }
    let status = code
        .parse::<u16>()
        .map_err(|_| FetchError::MalformedStatusLine(line.clone()))?;

    Ok((status, reason.to_string()))
}

fn read_headers<R: BufRead>(reader: &mut R) -> Result<Headers> {
    let mut headers = Headers::new();
    loop {
        let line = read_line(reader)?.ok_or_else(|| FetchError::MalformedHeader("unexpected end of headers".into()))?;
        if line.is_empty() {
            return Ok(headers);
        }
        let Some((name, value)) = line.split_once(':') else {
            return Err(FetchError::MalformedHeader(line));
        };
        headers.insert(name, value.trim());
    }
}

fn read_body<R: BufRead>(reader: &mut R, headers: &Headers) -> Result<Vec<u8>> {
    if let Some(coding) = headers.get("transfer-encoding") {
        if !coding.trim().eq_ignore_ascii_case("chunked") {
            return Err(FetchError::UnsupportedEncoding(coding.to_string()));
        }
        debug!("reading chunked body");
        return read_chunked(reader);
    }

    if let Some(length) = headers.get("content-length") {
        let malformed = || FetchError::MalformedHeader(format!("content-length: {}", length));
        let digits = length.trim();
        if !is_digits(digits) {
            return Err(malformed());
        }
        let length = digits.parse::<usize>().map_err(|_| malformed())?;
        debug!(length, "reading length-delimited body");
        return read_exact_length(reader, length);
    }

    debug!("reading body until close");
    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    Ok(body)
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let line = read_line(reader)?.ok_or_else(|| FetchError::MalformedChunk("missing chunk size".into()))?;
        let size = line.split(';').next().unwrap_or_default().trim();
        if !is_hex_digits(size) {
            return Err(FetchError::MalformedChunk(line.clone()));
        }
        let size = usize::from_str_radix(size, 16).map_err(|_| FetchError::MalformedChunk(line.clone()))?;

        if size == 0 {
            // trailers
            while let Some(trailer) = read_line(reader)? {
                if trailer.is_empty() {
                    break;
                }
            }
            return Ok(body);
        }

        let start = body.len();
        let read = reader.by_ref().take(size as u64).read_to_end(&mut body)?;
        if read < size {
            return Err(FetchError::TruncatedBody {
                expected: start.saturating_add(size),
                actual:   body.len(),
            });
        }

        match read_line(reader)? {
            Some(rest) if rest.is_empty() => {}
            Some(rest) => return Err(FetchError::MalformedChunk(rest)),
            None => {
                return Err(FetchError::TruncatedBody {
                    expected: body.len().saturating_add(2),
                    actual:   body.len(),
                });
            }
        }
    }
}

fn read_exact_length<R: BufRead>(reader: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(length.min(1 << 20));
    while body.len() < length {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Err(FetchError::TruncatedBody {
                expected: length,
                actual:   body.len(),
            });
        }
        let remaining = length - body.len();
        let take = remaining.min(available.len());
        // A lone CRLF short of the declared length ends the body early.
        if take < remaining && &available[..take] == b"\r\n" {
            reader.consume(take);
            break;
        }
        body.extend_from_slice(&available[..take]);
        reader.consume(take);
    }
    Ok(body)
}
