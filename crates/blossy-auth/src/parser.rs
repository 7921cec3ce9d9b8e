//! Parser for kind-24242 Blossom authorization events.
//!
//! Recognised tags:
//!
//! | tag          | count       | meaning                              |
//! |--------------|-------------|--------------------------------------|
//! | `t`          | exactly one | granted action                       |
//! | `expiration` | exactly one | unix seconds after which it is void  |
//! | `x`          | any         | blob allowlist (empty = any blob)    |
//! | `server`     | any         | server allowlist (empty = any server)|
//!
//! Every other tag is ignored.

use chrono::{DateTime, Utc};
use tracing::debug;

use blossy_contracts::{
    capability::{Action, Capability},
    error::{AuthError, AuthResult},
    event::{SignedEvent, KIND_BLOSSOM_AUTH},
    hash::ResourceHash,
};
use blossy_core::traits::CapabilityParser;

/// Upper bound on tags per event, checked before any tag is read.
pub const MAX_TAGS: usize = 512;

/// [`CapabilityParser`] for Blossom authorization tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlossomAuthParser;

impl BlossomAuthParser {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityParser for BlossomAuthParser {
    fn kind(&self) -> u16 {
        KIND_BLOSSOM_AUTH
    }

    fn parse(&self, event: &SignedEvent) -> AuthResult<Capability> {
        if event.kind != KIND_BLOSSOM_AUTH {
            return Err(AuthError::WrongKind {
                expected: KIND_BLOSSOM_AUTH,
                actual: event.kind,
            });
        }
        if event.tags.len() > MAX_TAGS {
            return Err(AuthError::TooManyTags {
                count: event.tags.len(),
                max: MAX_TAGS,
            });
        }

        let mut action: Option<Action> = None;
        let mut expiration: Option<i64> = None;
        let mut resource_hashes = Vec::new();
        let mut hostnames = Vec::new();

        for (key, value) in event.tag_pairs() {
            match key {
                "t" => {
                    if action.is_some() {
                        return Err(AuthError::DuplicateTag { tag: "t" });
                    }
                    action = Some(value.parse()?);
                }
                "expiration" => {
                    if expiration.is_some() {
                        return Err(AuthError::DuplicateTag { tag: "expiration" });
                    }
                    let secs = value.parse::<i64>().map_err(|_| AuthError::InvalidExpiration {
                        value: value.to_string(),
                    })?;
                    expiration = Some(secs);
                }
                "x" => match ResourceHash::parse(value) {
                    Ok(hash) => resource_hashes.push(hash),
                    Err(e) => debug!(value, error = %e, "skipping malformed 'x' tag"),
                },
                "server" => hostnames.push(value.to_string()),
                _ => {}
            }
        }

        let action = action.ok_or(AuthError::MissingTag { tag: "t" })?;
        let expiration = expiration.ok_or(AuthError::MissingTag { tag: "expiration" })?;

        Ok(Capability {
            principal: event.pubkey.clone(),
            created_at: timestamp(event.created_at, "created_at")?,
            expiration: timestamp(expiration, "expiration")?,
            action,
            resource_hashes,
            hostnames,
        })
    }
}

fn timestamp(secs: i64, field: &'static str) -> AuthResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(AuthError::InvalidTimestamp { field })
}
