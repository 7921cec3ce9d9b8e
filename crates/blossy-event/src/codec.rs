//! Base64 variant detection.
//!
//! Clients disagree on which base64 flavour to use for the token, so the
//! payload is inspected before decoding:
//!
//! | contains `-` or `_` | contains `+` or `/` | trailing `=` | engine            |
//! |---------------------|---------------------|--------------|-------------------|
//! | yes                 | yes                 | any          | rejected          |
//! | yes                 | no                  | yes          | `URL_SAFE`        |
//! | yes                 | no                  | no           | `URL_SAFE_NO_PAD` |
//! | no                  | any                 | yes          | `STANDARD`        |
//! | no                  | any                 | no           | `STANDARD_NO_PAD` |

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use blossy_contracts::error::{AuthError, AuthResult};

/// Decode `s`, picking the alphabet and padding mode from its content.
pub fn decode_base64(s: &str) -> AuthResult<Vec<u8>> {
    let is_url_safe = s.contains(['-', '_']);
    let is_standard = s.contains(['+', '/']);
    let is_padded = s.ends_with('=');

    if is_url_safe && is_standard {
        return Err(AuthError::InvalidBase64 {
            reason: "ambiguous base64: contains both standard (+/) and URL-safe (-_) characters"
                .to_string(),
        });
    }

    let decoded = match (is_url_safe, is_padded) {
        (true, true) => URL_SAFE.decode(s),
        (true, false) => URL_SAFE_NO_PAD.decode(s),
        (false, true) => STANDARD.decode(s),
        (false, false) => STANDARD_NO_PAD.decode(s),
    };

    decoded.map_err(|e| AuthError::InvalidBase64 {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Encodes with both `+` and `/` (or `-` and `_`) plus padding.
    const RAW: &[u8] = b"subjects?_d>>";

    #[test]
    fn decodes_every_variant() {
        for engine in [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD] {
            let encoded = engine.encode(RAW);
            assert_eq!(decode_base64(&encoded).unwrap(), RAW, "variant {encoded}");
        }
    }

    #[test]
    fn plain_alphabet_without_padding_uses_standard_no_pad() {
        // "hello" → "aGVsbG8=" padded; strip the pad.
        assert_eq!(decode_base64("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn mixed_alphabets_are_ambiguous() {
        match decode_base64("ab+c-d") {
            Err(AuthError::InvalidBase64 { reason }) => assert!(reason.contains("ambiguous")),
            other => panic!("expected ambiguous base64 error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            decode_base64("!!!!"),
            Err(AuthError::InvalidBase64 { .. })
        ));
    }
}
