//! Building and signing events.
//!
//! Servers never sign, but clients, tools, and tests need to mint tokens
//! that the verifier accepts.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use k256::schnorr::signature::hazmat::PrehashSigner;
use k256::schnorr::SigningKey;
use thiserror::Error;

use blossy_contracts::event::SignedEvent;

use crate::{extract::SCHEME, verify::canonical_digest};

/// Errors raised while minting an event.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid secret key: {reason}")]
    InvalidSecretKey { reason: String },

    #[error("signing failed")]
    Signing,

    #[error("failed to encode event: {reason}")]
    Encoding { reason: String },
}

/// The unsigned parts of an event.
#[derive(Debug, Clone, Default)]
pub struct EventBuilder {
    kind: u16,
    tags: Vec<Vec<String>>,
    content: String,
}

impl EventBuilder {
    pub fn new(kind: u16) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Append a two-element `[key, value]` tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(vec![key.into(), value.into()]);
        self
    }

    /// Append a tag with arbitrary elements.
    pub fn raw_tag(mut self, elements: Vec<String>) -> Self {
        self.tags.push(elements);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// A secp256k1 secret key able to sign events.
pub struct EventSigner {
    key: SigningKey,
}

impl EventSigner {
    /// Load a signer from a 64-character hex secret key.
    pub fn from_hex(secret: &str) -> Result<Self, SignError> {
        let bytes = hex::decode(secret).map_err(|e| SignError::InvalidSecretKey {
            reason: e.to_string(),
        })?;
        let key = SigningKey::from_bytes(&bytes).map_err(|_| SignError::InvalidSecretKey {
            reason: "not a valid secp256k1 scalar".to_string(),
        })?;
        Ok(Self { key })
    }

    /// Hex x-only public key, as it appears in `pubkey`.
    pub fn public_key(&self) -> String {
        hex::encode(self.key.verifying_key().to_bytes())
    }

    /// Fill in `pubkey`, `id` and `sig` for `builder` at `created_at`.
    pub fn sign(&self, builder: EventBuilder, created_at: i64) -> Result<SignedEvent, SignError> {
        let mut event = SignedEvent {
            id: String::new(),
            pubkey: self.public_key(),
            created_at,
            kind: builder.kind,
            tags: builder.tags,
            content: builder.content,
            sig: String::new(),
        };

        let digest = canonical_digest(&event);
        let signature = self
            .key
            .sign_prehash(&digest)
            .map_err(|_| SignError::Signing)?;

        event.id = hex::encode(digest);
        event.sig = hex::encode(signature.to_bytes());
        Ok(event)
    }
}

/// Render `event` as an `Authorization` header value (`Nostr <base64>`),
/// using the padded standard alphabet.
pub fn encode_header(event: &SignedEvent) -> Result<String, SignError> {
    let json = serde_json::to_vec(event).map_err(|e| SignError::Encoding {
        reason: e.to_string(),
    })?;
    Ok(format!("{SCHEME} {}", STANDARD.encode(json)))
}
