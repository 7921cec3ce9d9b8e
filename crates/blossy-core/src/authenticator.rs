//! The authenticator: turns a request into a principal or a rejection.
//!
//! Pipeline for every call:
//!
//!   Extract → Verify → Resolve action → Parse (by kind) → Validate
//!
//! A missing `Authorization` header is not a failure: the request proceeds
//! without a principal and downstream policy decides whether that is
//! acceptable. Any other failure is terminal and no principal is returned.
//! Failures come back as [`AuthError::Rejected`] carrying the stage that
//! produced them; [`AuthError::root`] recovers the component error.
//!
//! Tokens carry no nonce, so a valid token can be replayed until it
//! expires. Callers needing replay protection must add it around this call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use blossy_contracts::{
    capability::AuthClaim,
    error::{AuthError, AuthResult, AuthStage},
    hash::ResourceHash,
    request::AUTHORIZATION_HEADER,
};
use blossy_event::{extract_event, verify_event};

use crate::{
    resolver::implied_action_for,
    traits::{AuthRequest, CapabilityParser, CapabilityValidator},
};

/// Authorizes requests against signed capability tokens.
///
/// Stateless apart from its registered components, so one instance can be
/// shared (e.g. behind an `Arc`) by every worker serving requests.
pub struct Authenticator {
    parsers: HashMap<u16, Box<dyn CapabilityParser>>,
    validator: Box<dyn CapabilityValidator>,
}

impl Authenticator {
    /// Create an authenticator with no parsers registered.
    pub fn new(validator: Box<dyn CapabilityValidator>) -> Self {
        Self {
            parsers: HashMap::new(),
            validator,
        }
    }

    /// Register `parser` for the event kind it reports. Registering the same
    /// kind twice replaces the previous parser.
    pub fn with_parser(mut self, parser: Box<dyn CapabilityParser>) -> Self {
        self.parsers.insert(parser.kind(), parser);
        self
    }

    /// Event kinds this authenticator accepts.
    pub fn kinds(&self) -> impl Iterator<Item = u16> + '_ {
        self.parsers.keys().copied()
    }

    /// Authorize `request` for `hostname` and, when known, the blob `hash`.
    ///
    /// Returns `Ok(Some(pubkey))` for a valid token, `Ok(None)` when no
    /// token was presented, and `Err` for everything else.
    ///
    /// Pass `None` for `hash` only when the request has no target blob yet
    /// (e.g. an upload whose digest is unknown). `Some(&ResourceHash::ZERO)`
    /// is a real hash and is matched like any other.
    pub fn authenticate<R: AuthRequest + ?Sized>(
        &self,
        request: &R,
        hostname: &str,
        hash: Option<&ResourceHash>,
    ) -> AuthResult<Option<String>> {
        self.authenticate_at(request, hostname, hash, Utc::now())
    }

    /// [`authenticate`](Self::authenticate) with an explicit clock.
    pub fn authenticate_at<R: AuthRequest + ?Sized>(
        &self,
        request: &R,
        hostname: &str,
        hash: Option<&ResourceHash>,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<String>> {
        let method = request.method();
        let path = request.path();

        // ── Step 1: Extract ──────────────────────────────────────────────────
        let event = match extract_event(request.header(AUTHORIZATION_HEADER)) {
            Ok(event) => event,
            Err(AuthError::MissingHeader) => {
                debug!(%method, %path, "no authorization header, proceeding unauthenticated");
                return Ok(None);
            }
            Err(e) => return Err(reject(AuthStage::Extract, method, path, e)),
        };

        // ── Step 2: Verify id binding and signature ──────────────────────────
        verify_event(&event).map_err(|e| reject(AuthStage::Verify, method, path, e))?;

        // ── Step 3: Resolve the implied action ───────────────────────────────
        let action =
            implied_action_for(request).map_err(|e| reject(AuthStage::Resolve, method, path, e))?;

        // ── Step 4: Parse claims with the parser for this kind ───────────────
        let parser = self.parsers.get(&event.kind).ok_or_else(|| {
            reject(
                AuthStage::Parse,
                method,
                path,
                AuthError::UnsupportedKind { kind: event.kind },
            )
        })?;
        let capability = parser
            .parse(&event)
            .map_err(|e| reject(AuthStage::Parse, method, path, e))?;

        // ── Step 5: Validate against this request ────────────────────────────
        let claim = AuthClaim {
            action,
            hash,
            hostname,
        };
        self.validator
            .validate(&capability, &claim, now)
            .map_err(|e| reject(AuthStage::Validate, method, path, e))?;

        debug!(
            principal = %capability.principal,
            %action,
            %method,
            %path,
            "request authenticated"
        );
        Ok(Some(capability.principal))
    }
}

fn reject(stage: AuthStage, method: &str, path: &str, err: AuthError) -> AuthError {
    warn!(stage = stage.as_str(), %method, %path, error = %err, "auth failed");
    err.at(stage)
}

// ── Tests ────────────────────────────────────────────────────────────────────
