//! Validation of a parsed capability against a request.

use chrono::{DateTime, Duration, Utc};

use blossy_contracts::{
    capability::{AuthClaim, Capability},
    error::{AuthError, AuthResult},
};
use blossy_core::traits::CapabilityValidator;

/// Tolerated clock difference between client and server, applied to both
/// `created_at` and `expiration`.
pub const CLOCK_SKEW: Duration = Duration::seconds(10);

/// [`CapabilityValidator`] implementing the Blossom authorization rules.
///
/// Checks run in a fixed order and the first failure wins: creation time,
/// expiration, action, blob allowlist, then server allowlist.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlossomAuthValidator;

impl BlossomAuthValidator {
    pub fn new() -> Self {
        Self
    }
}

impl CapabilityValidator for BlossomAuthValidator {
    fn validate(
        &self,
        capability: &Capability,
        claim: &AuthClaim<'_>,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        // Past the ends of the representable range nothing can be later or
        // earlier than the bound, so those checks pass.
        if let Some(latest) = now.checked_add_signed(CLOCK_SKEW) {
            if capability.created_at > latest {
                return Err(AuthError::CreatedInFuture);
            }
        }
        if let Some(earliest) = now.checked_sub_signed(CLOCK_SKEW) {
            if capability.expiration < earliest {
                return Err(AuthError::Expired);
            }
        }

        if capability.action != claim.action {
            return Err(AuthError::WrongAction {
                expected: claim.action,
                actual: capability.action,
            });
        }

        // A restricted token with no hash to check is a mismatch, not a pass.
        if !capability.covers_any_resource() {
            let allowed = claim
                .hash
                .is_some_and(|h| capability.resource_hashes.contains(h));
            if !allowed {
                return Err(AuthError::HashNotAuthorized {
                    expected: claim.hash.copied(),
                });
            }
        }

        if !capability.covers_any_server()
            && !capability.hostnames.iter().any(|h| h == claim.hostname)
        {
            return Err(AuthError::HostnameNotAuthorized {
                expected: claim.hostname.to_string(),
            });
        }

        Ok(())
    }
}
