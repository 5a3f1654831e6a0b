//! Inline image payloads as base64 `data:` URIs.
//!
//! Uploaded images are persisted as `data:<type>/<subtype>;base64,<data>`
//! strings, the same shape a browser `FileReader.readAsDataURL` produces, so
//! the stored value can be dropped straight into an `<img src>`.

#[cfg(test)]
#[path = "data_uri_test.rs"]
mod data_uri_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::consts::FALLBACK_MIME;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Error returned by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUriError {
    #[error("payload does not start with `data:`")]
    MissingScheme,
    #[error("payload has no `,` separating header and data")]
    MissingData,
    #[error("payload is not base64 encoded")]
    NotBase64,
    #[error("invalid media type: {0:?}")]
    InvalidMime(String),
    #[error("invalid base64 data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A decoded inline payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Encode `bytes` as a base64 data URI of type `mime`.
#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("{SCHEME}{mime}{BASE64_MARKER},{}", STANDARD.encode(bytes))
}

/// Parse and fully decode a base64 data URI.
///
/// # Errors
///
/// Returns a [`DataUriError`] describing the first structural problem found.
pub fn parse(raw: &str) -> Result<InlineImage, DataUriError> {
    let rest = raw.strip_prefix(SCHEME).ok_or(DataUriError::MissingScheme)?;
    let (header, data) = rest.split_once(',').ok_or(DataUriError::MissingData)?;
    let params = header.strip_suffix(BASE64_MARKER).ok_or(DataUriError::NotBase64)?;
    let mime = params.split(';').next().unwrap_or_default();
    if !is_valid_mime(mime) {
        return Err(DataUriError::InvalidMime(mime.to_owned()));
    }
    let bytes = STANDARD.decode(data)?;
    Ok(InlineImage { mime: mime.to_owned(), bytes })
}

/// `type/subtype` built from RFC 2045 token characters, optionally followed
/// by `;name=value` parameters.
///
/// Anything accepted here can be passed to [`encode`] and read back by
/// [`parse`]; in particular a `,` never reaches the header.
#[must_use]
pub fn is_valid_mime(mime: &str) -> bool {
    let mut parts = mime.split(';');
    let essence = parts.next().unwrap_or_default();
    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };
    is_token(kind)
        && is_token(subtype)
        && parts.all(|param| param.split_once('=').is_some_and(|(name, value)| is_token(name) && is_token(value)))
}

fn is_token(raw: &str) -> bool {
    const TSPECIALS: &[u8] = b"()<>@,;:\\\"/[]?=";

    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_graphic() && !TSPECIALS.contains(&b))
}

/// Identify common image formats from their leading bytes.
///
/// Unrecognized content is labelled `application/octet-stream`.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    if bytes.starts_with(PNG) {
        return "image/png";
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return "image/webp";
    }
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" && matches!(&bytes[8..12], b"avif" | b"avis") {
        return "image/avif";
    }
    if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        return "image/tiff";
    }
    if bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return "image/x-icon";
    }
    if bytes.starts_with(b"BM") {
        return "image/bmp";
    }
    if looks_like_svg(bytes) {
        return "image/svg+xml";
    }
    FALLBACK_MIME
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}
