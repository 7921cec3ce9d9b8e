//! Client-declared upload metadata (`X-SHA-256`, `X-Content-Type`,
//! `X-Content-Length`), as sent with `HEAD /upload` checks.

use blossy_contracts::{blob::UploadHints, error::BlossomError, hash::ResourceHash};

use crate::traits::AuthRequest;

pub const SHA256_HEADER: &str = "X-SHA-256";
pub const CONTENT_TYPE_HEADER: &str = "X-Content-Type";
pub const CONTENT_LENGTH_HEADER: &str = "X-Content-Length";

/// Collect the upload hints present on `request`.
///
/// Absent headers stay `None`. Present but malformed ones are a 400.
pub fn upload_hints<R: AuthRequest + ?Sized>(request: &R) -> Result<UploadHints, BlossomError> {
    let hash = match request.header(SHA256_HEADER) {
        Some(v) => Some(ResourceHash::parse(v.trim()).map_err(|e| {
            BlossomError::bad_request(format!("invalid {SHA256_HEADER} header: {e}"))
        })?),
        None => None,
    };

    let size = match request.header(CONTENT_LENGTH_HEADER) {
        Some(v) => Some(v.trim().parse::<u64>().map_err(|e| {
            BlossomError::bad_request(format!("invalid {CONTENT_LENGTH_HEADER} header: {e}"))
        })?),
        None => None,
    };

    let content_type = request
        .header(CONTENT_TYPE_HEADER)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    Ok(UploadHints {
        hash,
        content_type,
        size,
    })
}
