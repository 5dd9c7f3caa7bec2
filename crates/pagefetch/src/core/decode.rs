//! Content-encoding removal.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::{FetchError, Result};

/// Supported `content-encoding` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentEncoding {
    #[default]
    Identity,
    Gzip,
}

impl ContentEncoding {
    /// Interpret a `content-encoding` header value; absent means identity.
    pub fn from_header(value: Option<&str>) -> Result<Self> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(Self::Identity);
        };
        if value.eq_ignore_ascii_case("identity") {
            Ok(Self::Identity)
        } else if value.eq_ignore_ascii_case("gzip") || value.eq_ignore_ascii_case("x-gzip") {
            Ok(Self::Gzip)
        } else {
            Err(FetchError::UnsupportedEncoding(value.to_string()))
        }
    }
}

/// Undo `encoding` on a fully assembled body.
pub fn decode_body(encoding: ContentEncoding, body: Vec<u8>) -> Result<Vec<u8>> {
    match encoding {
        ContentEncoding::Identity => Ok(body),
        ContentEncoding::Gzip => {
            let mut decoded = Vec::with_capacity(body.len().saturating_mul(2));
            GzDecoder::new(body.as_slice())
                .read_to_end(&mut decoded)
                .map_err(FetchError::Decompress)?;
            Ok(decoded)
        }
    }
}
