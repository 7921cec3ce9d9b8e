//! Core trait definitions for the authorization pipeline.
//!
//! - `AuthRequest`        : what the host's request type must expose
//! - `CapabilityParser`   : turns one kind of signed event into a `Capability`
//! - `CapabilityValidator`: decides whether a `Capability` grants a claim
//!
//! The [`Authenticator`](crate::Authenticator) wires them together. Parsers
//! are registered per event kind, so new token formats can share the same
//! transport and signature layer without touching it.

use chrono::{DateTime, Utc};

use blossy_contracts::{
    capability::{AuthClaim, Capability},
    error::AuthResult,
    event::SignedEvent,
    request::RequestParts,
};

/// The view of an inbound HTTP request that authorization needs.
pub trait AuthRequest {
    /// Upper-case HTTP method.
    fn method(&self) -> &str;

    /// Absolute URL path, without query.
    fn path(&self) -> &str;

    /// First value of the named header, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;
}

impl AuthRequest for RequestParts {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<&str> {
        RequestParts::header(self, name)
    }
}

#[cfg(feature = "http")]
impl<B> AuthRequest for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name)?.to_str().ok()
    }
}

/// Parses the tags of one event kind into a [`Capability`].
///
/// Implementations only interpret structure. The event's signature has
/// already been verified, and validity against the request is checked later
/// by a [`CapabilityValidator`].
pub trait CapabilityParser: Send + Sync {
    /// The event kind this parser handles.
    fn kind(&self) -> u16;

    fn parse(&self, event: &SignedEvent) -> AuthResult<Capability>;
}

/// Checks a parsed capability against a concrete authorization question.
///
/// Implementations must be deterministic given `now` and must not perform
/// I/O; they run on every authorized request.
pub trait CapabilityValidator: Send + Sync {
    fn validate(
        &self,
        capability: &Capability,
        claim: &AuthClaim<'_>,
        now: DateTime<Utc>,
    ) -> AuthResult<()>;
}

// ── Tests ────────────────────────────────────────────────────────────────────
