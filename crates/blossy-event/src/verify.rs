//! Identifier binding and signature verification.
//!
//! An event's `id` is the SHA-256 of a canonical serialization of its
//! content, and `sig` is a BIP-340 Schnorr signature over those 32 bytes.
//!
//! Canonical serialization (compact JSON, no whitespace):
//!
//! ```text
//! [0, <pubkey>, <created_at>, <kind>, <tags>, <content>]
//! ```
//!
//! Both checks must pass: a valid signature over a stale `id` would let an
//! attacker rewrite tags after signing.

use k256::schnorr::signature::hazmat::PrehashVerifier;
use k256::schnorr::{Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use tracing::debug;

use blossy_contracts::{
    error::{AuthError, AuthResult},
    event::SignedEvent,
};

/// Length of an x-only public key in bytes.
const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of a BIP-340 signature in bytes.
const SIGNATURE_LENGTH: usize = 64;

/// SHA-256 of the canonical serialization of `event`.
pub fn canonical_digest(event: &SignedEvent) -> [u8; 32] {
    let canonical = serde_json::json!([
        0,
        event.pubkey,
        event.created_at,
        event.kind,
        event.tags,
        event.content,
    ]);
    Sha256::digest(canonical.to_string().as_bytes()).into()
}

/// The identifier `event` should carry, as lowercase hex.
pub fn compute_id(event: &SignedEvent) -> String {
    hex::encode(canonical_digest(event))
}

/// Check that `event.id` matches its content and `event.sig` is a valid
/// signature by `event.pubkey` over that id.
pub fn verify_event(event: &SignedEvent) -> AuthResult<()> {
    let digest = canonical_digest(event);
    if hex::encode(digest) != event.id {
        debug!(event_id = %event.id, "event id does not match its content");
        return Err(AuthError::InvalidEventId);
    }

    let key = parse_public_key(&event.pubkey)?;
    let signature = parse_signature(&event.sig)?;

    key.verify_prehash(&digest, &signature)
        .map_err(|_| AuthError::InvalidSignature {
            reason: "signature does not match the event id and public key".to_string(),
        })
}

fn parse_public_key(pubkey: &str) -> AuthResult<VerifyingKey> {
    let bytes = hex::decode(pubkey).map_err(|_| AuthError::InvalidSignature {
        reason: "public key is not valid hex".to_string(),
    })?;
    let bytes = <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
        AuthError::InvalidSignature {
            reason: format!(
                "public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ),
        }
    })?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| AuthError::InvalidSignature {
        reason: "public key is not an x-only secp256k1 point".to_string(),
    })
}

fn parse_signature(sig: &str) -> AuthResult<Signature> {
    let bytes = hex::decode(sig).map_err(|_| AuthError::InvalidSignature {
        reason: "signature is not valid hex".to_string(),
    })?;
    let bytes = <[u8; SIGNATURE_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
        AuthError::InvalidSignature {
            reason: format!(
                "signature must be {SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            ),
        }
    })?;
    Signature::try_from(bytes.as_slice()).map_err(|_| AuthError::InvalidSignature {
        reason: "signature is not a valid BIP-340 signature".to_string(),
    })
}
