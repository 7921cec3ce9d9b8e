//! Content identifiers for blobs.
//!
//! A blob is addressed by the SHA-256 digest of its bytes. On the wire the
//! digest always travels as 64 hex characters; in memory it is kept as the
//! raw 32 bytes so equality is byte-exact regardless of the input casing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of a hex-encoded [`ResourceHash`].
pub const HASH_HEX_LENGTH: usize = 64;

/// Why a string could not be parsed as a [`ResourceHash`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("invalid hash length: expected {HASH_HEX_LENGTH} hex characters, got {len}")]
    InvalidLength { len: usize },

    #[error("invalid hash: contains non-hex characters")]
    InvalidHex,
}

/// The SHA-256 identifier of a blob.
///
/// Immutable once parsed. `Display` always yields the canonical lowercase
/// hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResourceHash([u8; 32]);

impl ResourceHash {
    /// The all-zero hash.
    ///
    /// This is a legitimate value to authorize against, distinct from "no
    /// hash supplied" (which callers express as `None`).
    pub const ZERO: ResourceHash = ResourceHash([0u8; 32]);

    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex string. Upper- and lowercase are accepted.
    pub fn parse(s: &str) -> Result<Self, HashError> {
        if s.len() != HASH_HEX_LENGTH {
            return Err(HashError::InvalidLength { len: s.len() });
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| HashError::InvalidHex)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Canonical lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ResourceHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ResourceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHash({})", self.to_hex())
    }
}

impl Serialize for ResourceHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ResourceHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "44f875eff24db8e87ee4057e7e5b65e50091680e6497bb8b1fbba223ec998089";

    #[test]
    fn parses_and_displays_lowercase() {
        let hash = ResourceHash::parse(SAMPLE).unwrap();
        assert_eq!(hash.to_string(), SAMPLE);

        let upper = ResourceHash::parse(&SAMPLE.to_uppercase()).unwrap();
        assert_eq!(upper, hash, "casing must not affect equality");
        assert_eq!(upper.to_string(), SAMPLE);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            ResourceHash::parse(&SAMPLE[..63]),
            Err(HashError::InvalidLength { len: 63 })
        );
        assert_eq!(
            ResourceHash::parse(&format!("{SAMPLE}0")),
            Err(HashError::InvalidLength { len: 65 })
        );
        assert_eq!(ResourceHash::parse(""), Err(HashError::InvalidLength { len: 0 }));
    }

    #[test]
    fn rejects_non_hex() {
        let bad = "zz".repeat(32);
        assert_eq!(ResourceHash::parse(&bad), Err(HashError::InvalidHex));
    }

    #[test]
    fn zero_hash_is_all_zero_hex() {
        assert_eq!(ResourceHash::ZERO.to_string(), "0".repeat(64));
        assert_eq!(ResourceHash::default(), ResourceHash::ZERO);
    }

    #[test]
    fn serde_uses_hex_string() {
        let hash = ResourceHash::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));

        let err = serde_json::from_str::<ResourceHash>("\"not-a-hash\"");
        assert!(err.is_err());
    }
}
