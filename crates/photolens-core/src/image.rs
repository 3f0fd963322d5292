//! Decoding of client-submitted image payloads.
//!
//! Clients send either raw base64 or a data URI
//! (`data:image/png;base64,iVBOR...`). The prefix is stripped before
//! decoding and its MIME type, when present, wins over magic-byte sniffing.

use base64::Engine;

use crate::defaults::FALLBACK_IMAGE_MIME;
use crate::{Error, Result};

/// A decoded image ready for the generation client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Split a data URI into its declared MIME type and base64 body.
///
/// Returns `(None, input)` when the input carries no data-URI prefix.
pub fn split_data_uri(input: &str) -> (Option<&str>, &str) {
    let Some(rest) = input.strip_prefix("data:") else {
        return (None, input);
    };
    match rest.split_once(',') {
        Some((meta, body)) => {
            let mime = meta
                .split(';')
                .next()
                .map(str::trim)
                .filter(|m| !m.is_empty());
            (mime, body)
        }
        None => (None, input),
    }
}

/// Decode a request image field into bytes and a MIME type.
pub fn decode_image(input: &str) -> Result<ImagePayload> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Image data is required".into()));
    }

    let (declared_mime, body) = split_data_uri(trimmed);
    // Some clients line-wrap base64.
    let body: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body.as_bytes())
        .map_err(|e| Error::InvalidInput(format!("Invalid base64 image data: {}", e)))?;

    if bytes.is_empty() {
        return Err(Error::InvalidInput("Image data is empty".into()));
    }

    let mime_type = declared_mime
        .map(str::to_string)
        .or_else(|| infer::get(&bytes).map(|kind| kind.mime_type().to_string()))
        .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string());

    Ok(ImagePayload { bytes, mime_type })
}
