//! The signed event envelope.
//!
//! Tokens travel as signed Nostr events. The envelope is generic: it carries
//! a `kind` number and a list of string tags whose meaning depends on the
//! kind. Interpreting the tags is the job of a kind-specific parser.

use serde::{Deserialize, Serialize};

/// Kind of a Blossom authorization event.
pub const KIND_BLOSSOM_AUTH: u16 = 24242;

/// Kind of a NIP-56 report event.
pub const KIND_REPORT: u16 = 1984;

/// A signed event exactly as it appears on the wire.
///
/// Nothing here has been checked yet: `id` may not match the content and
/// `sig` may be garbage until the event passes signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEvent {
    /// Hex SHA-256 of the canonical serialization.
    pub id: String,
    /// Hex x-only secp256k1 public key of the signer.
    pub pubkey: String,
    /// Unix seconds.
    pub created_at: i64,
    pub kind: u16,
    /// Ordered tags; the first element of each tag is its key.
    pub tags: Vec<Vec<String>>,
    pub content: String,
    /// Hex BIP-340 signature over `id`.
    pub sig: String,
}

impl SignedEvent {
    /// Iterate `(key, value)` pairs of tags that have at least two elements.
    pub fn tag_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .filter(|tag| tag.len() >= 2)
            .map(|tag| (tag[0].as_str(), tag[1].as_str()))
    }
}
