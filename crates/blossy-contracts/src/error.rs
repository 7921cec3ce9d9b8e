//! Error types for the blossy stack.
//!
//! `AuthError` covers everything that can go wrong while authorizing a
//! request. Every variant belongs to exactly one `ErrorCategory`, which is
//! what callers use to choose an HTTP status. `BlossomError` is the
//! HTTP-facing shape (status code plus a reason for the `X-Reason` header).
//!
//! Messages name the failing check and, where useful, expected vs. actual
//! values. They never carry keys, signatures, or raw token bytes.

use std::fmt;

use thiserror::Error;

use crate::{capability::Action, hash::ResourceHash};

/// Broad classes of authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No token was presented. Not an error for the caller: the request
    /// proceeds without a principal.
    AbsentCredential,
    /// Bad scheme, bad base64, bad JSON.
    MalformedTransport,
    /// Well-formed transport carrying an invalid capability.
    StructuralViolation,
    /// Identifier mismatch or bad signature.
    Cryptographic,
    /// Valid capability that does not grant this request.
    SemanticMismatch,
}

/// Pipeline stage at which a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStage {
    Extract,
    Verify,
    Resolve,
    Parse,
    Validate,
}

impl AuthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStage::Extract => "extract",
            AuthStage::Verify => "verify",
            AuthStage::Resolve => "resolve",
            AuthStage::Parse => "parse",
            AuthStage::Validate => "validate",
        }
    }
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified authorization error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing 'Authorization' header")]
    MissingHeader,

    #[error("authorization scheme must be 'Nostr <base64_event>'")]
    InvalidScheme,

    #[error("failed to decode base64 event payload: {reason}")]
    InvalidBase64 { reason: String },

    #[error("invalid event json: {reason}")]
    InvalidJson { reason: String },

    #[error("invalid event ID")]
    InvalidEventId,

    #[error("invalid event signature: {reason}")]
    InvalidSignature { reason: String },

    /// No parser is registered for the event kind.
    #[error("unsupported event kind: {kind}")]
    UnsupportedKind { kind: u16 },

    /// A parser was handed an event of a kind it does not understand.
    #[error("event kind must be {expected}, got {actual}")]
    WrongKind { expected: u16, actual: u16 },

    #[error("event has too many tags: {count} exceeds the maximum of {max}")]
    TooManyTags { count: usize, max: usize },

    #[error("'{tag}' tag appears multiple times")]
    DuplicateTag { tag: &'static str },

    #[error("'{tag}' tag is missing")]
    MissingTag { tag: &'static str },

    #[error("invalid 't' tag: {value}")]
    InvalidAction { value: String },

    #[error("'expiration' tag is not a valid unix time: {value}")]
    InvalidExpiration { value: String },

    #[error("'{field}' is outside the representable time range")]
    InvalidTimestamp { field: &'static str },

    #[error("this request doesn't have an implied action: method={method} path={path}")]
    NoImpliedAction { method: String, path: String },

    #[error("event created at is in the future")]
    CreatedInFuture,

    #[error("event expiration is in the past")]
    Expired,

    #[error("expected action {expected}, got {actual}")]
    WrongAction { expected: Action, actual: Action },

    #[error("{}", describe_hash_mismatch(.expected))]
    HashNotAuthorized { expected: Option<ResourceHash> },

    #[error("server hostname {expected} is not authorized by the event")]
    HostnameNotAuthorized { expected: String },

    /// A component error annotated with the stage that produced it.
    #[error("auth failed during {stage}: {source}")]
    Rejected {
        stage: AuthStage,
        source: Box<AuthError>,
    },
}

fn describe_hash_mismatch(expected: &Option<ResourceHash>) -> String {
    match expected {
        Some(hash) => format!("hash {hash} is not authorized by the event"),
        None => "auth event has 'x' tags but no hash was provided to match against".to_string(),
    }
}

impl AuthError {
    /// Annotate `self` with the pipeline stage that produced it.
    pub fn at(self, stage: AuthStage) -> Self {
        AuthError::Rejected {
            stage,
            source: Box::new(self),
        }
    }

    /// The stage recorded on this error, if any.
    pub fn stage(&self) -> Option<AuthStage> {
        match self {
            AuthError::Rejected { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying component error, with stage annotations stripped.
    pub fn root(&self) -> &AuthError {
        match self {
            AuthError::Rejected { source, .. } => source.root(),
            other => other,
        }
    }

    /// Owned form of [`root`](Self::root).
    pub fn into_root(self) -> AuthError {
        match self {
            AuthError::Rejected { source, .. } => source.into_root(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::Rejected { source, .. } => source.category(),

            AuthError::MissingHeader => ErrorCategory::AbsentCredential,

            AuthError::InvalidScheme
            | AuthError::InvalidBase64 { .. }
            | AuthError::InvalidJson { .. } => ErrorCategory::MalformedTransport,

            AuthError::InvalidEventId | AuthError::InvalidSignature { .. } => {
                ErrorCategory::Cryptographic
            }

            AuthError::UnsupportedKind { .. }
            | AuthError::WrongKind { .. }
            | AuthError::TooManyTags { .. }
            | AuthError::DuplicateTag { .. }
            | AuthError::MissingTag { .. }
            | AuthError::InvalidAction { .. }
            | AuthError::InvalidExpiration { .. }
            | AuthError::InvalidTimestamp { .. } => ErrorCategory::StructuralViolation,

            AuthError::NoImpliedAction { .. }
            | AuthError::CreatedInFuture
            | AuthError::Expired
            | AuthError::WrongAction { .. }
            | AuthError::HashNotAuthorized { .. }
            | AuthError::HostnameNotAuthorized { .. } => ErrorCategory::SemanticMismatch,
        }
    }

    /// HTTP status a server should answer with: 400 for malformed input,
    /// 401 for everything else.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::MalformedTransport => 400,
            _ => 401,
        }
    }
}

/// Convenience alias for authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// An HTTP error with a status code and a human-readable reason.
///
/// Servers should write a non-empty `reason` to the `X-Reason` header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct BlossomError {
    pub code: u16,
    pub reason: String,
}

impl BlossomError {
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::new(400, reason)
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::new(401, reason)
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::new(403, reason)
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::new(404, reason)
    }

    pub fn too_large(reason: impl Into<String>) -> Self {
        Self::new(413, reason)
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(500, reason)
    }
}

impl From<AuthError> for BlossomError {
    fn from(err: AuthError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}

/// Errors raised while loading or validating server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config TOML: {reason}")]
    Parse { reason: String },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("server base url is not set")]
    MissingBaseUrl,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
