//! Locating and decoding the token in the `Authorization` header.

use blossy_contracts::{
    error::{AuthError, AuthResult},
    event::SignedEvent,
};

use crate::codec::decode_base64;

/// The only accepted authorization scheme. Case-sensitive.
pub const SCHEME: &str = "Nostr";

/// Turn a raw `Authorization` header value into a [`SignedEvent`].
///
/// A missing or empty header yields [`AuthError::MissingHeader`], which
/// callers treat as "no token presented" rather than as a failure. The
/// scheme is checked before any decoding happens.
pub fn extract_event(header: Option<&str>) -> AuthResult<SignedEvent> {
    let value = match header {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AuthError::MissingHeader),
    };

    let payload = split_scheme(value)?;
    let bytes = decode_base64(payload)?;

    serde_json::from_slice(&bytes).map_err(|e| AuthError::InvalidJson {
        reason: e.to_string(),
    })
}

/// Split `"Nostr <payload>"` on a single space and return the payload.
fn split_scheme(value: &str) -> AuthResult<&str> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(payload), None) if !payload.is_empty() => Ok(payload),
        _ => Err(AuthError::InvalidScheme),
    }
}
