//! Capability claims carried by an authorization token.
//!
//! A `Capability` is the typed reading of a signed kind-24242 event: who
//! signed it, when it stops being valid, which action it grants, and the
//! optional resource and server allowlists that narrow it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::AuthError, hash::ResourceHash};

/// The action a request performs and a capability grants.
///
/// Closed set: any other wire value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Get,
    Upload,
    List,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Get, Action::Upload, Action::List, Action::Delete];

    /// The wire name used in `t` tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Upload => "upload",
            Action::List => "list",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AuthError::InvalidAction {
                value: s.to_string(),
            })
    }
}

/// Parsed claims of a Blossom authorization token.
///
/// Constructed fresh for every request and dropped once the authorization
/// decision is made. Empty `resource_hashes` or `hostnames` are wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Hex x-only public key of the signer.
    pub principal: String,
    /// The signed event's own `created_at`.
    pub created_at: DateTime<Utc>,
    /// From the single `expiration` tag.
    pub expiration: DateTime<Utc>,
    /// From the single `t` tag.
    pub action: Action,
    /// Valid `x` tags, in tag order. Empty means any blob.
    pub resource_hashes: Vec<ResourceHash>,
    /// Raw `server` tags, in tag order. Empty means any server.
    pub hostnames: Vec<String>,
}

impl Capability {
    /// True when the capability is not restricted to specific blobs.
    pub fn covers_any_resource(&self) -> bool {
        self.resource_hashes.is_empty()
    }

    /// True when the capability is not restricted to specific servers.
    pub fn covers_any_server(&self) -> bool {
        self.hostnames.is_empty()
    }
}

/// The concrete authorization question asked of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthClaim<'a> {
    /// The action implied by the request.
    pub action: Action,
    /// The blob the request targets, when it is known.
    pub hash: Option<&'a ResourceHash>,
    /// Hostname of the server receiving the request.
    pub hostname: &'a str,
}
