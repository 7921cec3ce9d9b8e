//! Mapping a request to the action its token must grant.

use blossy_contracts::{
    capability::Action,
    error::{AuthError, AuthResult},
};

use crate::traits::AuthRequest;

/// Endpoints that create blobs, whatever the method (PUT uploads, HEAD
/// upload checks).
const UPLOAD_ENDPOINTS: [&str; 3] = ["upload", "media", "mirror"];

const LIST_ENDPOINT: &str = "list";

/// The action implied by `method` and `path`.
///
/// Path rules win over method rules. The list rule is a prefix match
/// anchored at the start of the path, so `/playlist` falls through to the
/// method rules.
pub fn implied_action(method: &str, path: &str) -> AuthResult<Action> {
    let p = path.strip_prefix('/').unwrap_or(path);

    if UPLOAD_ENDPOINTS.contains(&p) {
        return Ok(Action::Upload);
    }
    if p.starts_with(LIST_ENDPOINT) {
        return Ok(Action::List);
    }

    match method {
        "GET" | "HEAD" => Ok(Action::Get),
        "DELETE" => Ok(Action::Delete),
        _ => Err(AuthError::NoImpliedAction {
            method: method.to_string(),
            path: p.to_string(),
        }),
    }
}

/// [`implied_action`] for any [`AuthRequest`].
pub fn implied_action_for<R: AuthRequest + ?Sized>(request: &R) -> AuthResult<Action> {
    implied_action(request.method(), request.path())
}
