use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::data::{DataEncoding, DataUrl};
use crate::error::{FetchError, Result};

/// Decode the payload of a `data:` URL.
///
/// Only `text/*` and untyped payloads are supported. Base64 payloads are
/// base64-decoded first; the result is then percent-decoded.
///
/// # Examples
///
/// ```
/// use pagefetch::{Target, parse, core::decode_data_url};
///
/// let Target::Data(data) = parse("data:text/html,Hello%20world!").unwrap().target else { unreachable!() };
/// assert_eq!(decode_data_url(&data).unwrap(), b"Hello world!");
/// ```
pub fn decode_data_url(data: &DataUrl) -> Result<Vec<u8>> {
    if !data.media_type.is_empty() && data.media_type != "text" {
        return Err(FetchError::UnsupportedDataType(data.content_type()));
    }

    let decoded = match data.encoding {
        DataEncoding::Identity => data.payload.as_bytes().to_vec(),
        DataEncoding::Base64 => {
            let compact: String = data.payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            STANDARD
                .decode(compact)
                .map_err(|e| FetchError::InvalidDataPayload(e.to_string()))?
        }
    };

    Ok(percent_decode(&decoded))
}

fn percent_decode(input: &[u8]) -> Vec<u8> { percent_encoding::percent_decode(input).collect() }
