//! # blossy-auth
//!
//! Blossom authorization tokens (kind 24242) for the blossy runtime.
//!
//! ## Overview
//!
//! This crate provides [`BlossomAuthParser`] and [`BlossomAuthValidator`],
//! which implement the [`CapabilityParser`](blossy_core::traits::CapabilityParser)
//! and [`CapabilityValidator`](blossy_core::traits::CapabilityValidator)
//! traits, plus [`authenticator`] to wire them into a ready
//! [`Authenticator`]. Report events (kind 1984) are handled by [`report`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let auth = blossy_auth::authenticator();
//! match auth.authenticate(&request, "cdn.example.com", Some(&hash))? {
//!     Some(pubkey) => { /* authorized as pubkey */ }
//!     None => { /* no token presented */ }
//! }
//! ```
//!
//! ## Replay
//!
//! Tokens carry no nonce. A captured token stays usable until its
//! `expiration`, so keep expirations short.

pub mod parser;
pub mod report;
pub mod validator;

pub use parser::{BlossomAuthParser, MAX_TAGS};
pub use report::{parse_report, report_from_body};
pub use validator::{BlossomAuthValidator, CLOCK_SKEW};

use blossy_contracts::{error::AuthResult, hash::ResourceHash};
use blossy_core::{traits::AuthRequest, Authenticator};

/// An [`Authenticator`] accepting Blossom authorization tokens.
pub fn authenticator() -> Authenticator {
    Authenticator::new(Box::new(BlossomAuthValidator)).with_parser(Box::new(BlossomAuthParser))
}

/// Authorize `request` with Blossom tokens against the current time.
///
/// Shorthand for `authenticator().authenticate(..)`. Servers handling many
/// requests should build one [`Authenticator`] and share it instead.
pub fn authenticate<R: AuthRequest + ?Sized>(
    request: &R,
    hostname: &str,
    hash: Option<&ResourceHash>,
) -> AuthResult<Option<String>> {
    authenticator().authenticate(request, hostname, hash)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::{DateTime, TimeZone, Utc};

    use blossy_contracts::{
        capability::Action,
        error::{AuthError, AuthStage, ErrorCategory},
        event::KIND_BLOSSOM_AUTH,
        hash::ResourceHash,
        request::RequestParts,
        BlossomError,
    };
    use blossy_event::{compute_id, encode_header, EventBuilder, EventSigner};

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const SECRET: &str = "0000000000000000000000000000000000000000000000000000000000000002";
    const HOST: &str = "cdn.example.com";
    const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const NOW: i64 = 1_700_000_000;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW, 0).unwrap()
    }

    fn hash(hex: &str) -> ResourceHash {
        hex.parse().unwrap()
    }

    fn signer() -> EventSigner {
        EventSigner::from_hex(SECRET).unwrap()
    }

    /// Sign `builder` at `NOW` and wrap it in an `Authorization` value.
    fn header(builder: EventBuilder) -> String {
        encode_header(&signer().sign(builder, NOW).unwrap()).unwrap()
    }

    /// The upload token used by most scenarios: t=upload, 5 minute expiry,
    /// x=A, server=cdn.example.com.
    fn upload_token() -> EventBuilder {
        EventBuilder::new(KIND_BLOSSOM_AUTH)
            .tag("t", "upload")
            .tag("expiration", (NOW + 300).to_string())
            .tag("x", HASH_A)
            .tag("server", HOST)
            .content("Upload blob")
    }

    fn put_upload(header: String) -> RequestParts {
        RequestParts::new("PUT", "/upload").with_authorization(header)
    }

    /// Authorize at `NOW`, stripping the stage so results compare against
    /// the component error.
    fn check(
        request: &RequestParts,
        hostname: &str,
        expected: Option<&ResourceHash>,
    ) -> AuthResult<Option<String>> {
        authenticator()
            .authenticate_at(request, hostname, expected, now())
            .map_err(AuthError::into_root)
    }

    // ── End-to-end scenarios ──────────────────────────────────────────────────

    /// Matching action, hash and server: the signer is returned.
    #[test]
    fn upload_token_authorizes_its_hash() {
        let request = put_upload(header(upload_token()));
        assert_eq!(
            check(&request, HOST, Some(&hash(HASH_A))),
            Ok(Some(signer().public_key()))
        );
    }

    #[test]
    fn upload_token_rejects_other_hash() {
        let request = put_upload(header(upload_token()));
        assert_eq!(
            check(&request, HOST, Some(&hash(HASH_B))),
            Err(AuthError::HashNotAuthorized {
                expected: Some(hash(HASH_B))
            })
        );
    }

    #[test]
    fn expired_token_is_rejected_regardless_of_other_fields() {
        let token = EventBuilder::new(KIND_BLOSSOM_AUTH)
            .tag("t", "delete")
            .tag("expiration", (NOW - 11).to_string())
            .tag("x", HASH_A)
            .tag("server", "elsewhere.example");
        let request = put_upload(header(token));

        assert_eq!(
            check(&request, HOST, Some(&hash(HASH_B))),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn basic_scheme_is_rejected_before_decoding() {
        let request = put_upload("Basic abc123".to_string());
        let err = check(&request, HOST, None).unwrap_err();

        assert_eq!(err, AuthError::InvalidScheme);
        assert_eq!(err.category(), ErrorCategory::MalformedTransport);
        assert_eq!(BlossomError::from(err).code, 400);
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        let request = RequestParts::new("GET", &format!("/{HASH_A}"));
        assert_eq!(check(&request, HOST, Some(&hash(HASH_A))), Ok(None));
    }

    // ── Wildcards ─────────────────────────────────────────────────────────────

    /// No `x` tags: any hash, or none at all, is accepted.
    #[test]
    fn token_without_x_tags_accepts_any_hash() {
        let token = EventBuilder::new(KIND_BLOSSOM_AUTH)
            .tag("t", "get")
            .tag("expiration", (NOW + 60).to_string());
        let request = RequestParts::new("GET", &format!("/{HASH_B}.png"))
            .with_authorization(header(token));

        for expected in [Some(hash(HASH_A)), Some(hash(HASH_B)), Some(ResourceHash::ZERO), None] {
            assert!(
                check(&request, HOST, expected.as_ref()).is_ok(),
                "expected {:?} to be accepted",
                expected
            );
        }
    }

    /// No `server` tags: any hostname is accepted.
    #[test]
    fn token_without_server_tags_accepts_any_hostname() {
        let token = EventBuilder::new(KIND_BLOSSOM_AUTH)
            .tag("t", "list")
            .tag("expiration", (NOW + 60).to_string());
        let request = RequestParts::new("GET", "/list/somebody").with_authorization(header(token));

        for host in [HOST, "localhost:3000", "other.example"] {
            assert!(check(&request, host, None).is_ok(), "{host}");
        }
    }

    #[test]
    fn restricted_token_without_expected_hash_fails() {
        let request = put_upload(header(upload_token()));
        let err = check(&request, HOST, None).unwrap_err();
        assert_eq!(err, AuthError::HashNotAuthorized { expected: None });
        assert_eq!(err.category(), ErrorCategory::SemanticMismatch);
    }

    #[test]
    fn hostname_outside_server_tags_fails() {
        let request = put_upload(header(upload_token()));
        assert!(matches!(
            check(&request, "evil.example", Some(&hash(HASH_A))),
            Err(AuthError::HostnameNotAuthorized { .. })
        ));
    }

    // ── Action binding ────────────────────────────────────────────────────────

    /// An upload token cannot be used to delete.
    #[test]
    fn token_action_must_match_request() {
        let request = RequestParts::new("DELETE", &format!("/{HASH_A}"))
            .with_authorization(header(upload_token()));
        assert_eq!(
            check(&request, HOST, Some(&hash(HASH_A))),
            Err(AuthError::WrongAction {
                expected: Action::Delete,
                actual: Action::Upload
            })
        );
    }

    #[test]
    fn mirror_and_media_use_upload_tokens() {
        for path in ["/mirror", "/media"] {
            let request = RequestParts::new("PUT", path).with_authorization(header(upload_token()));
            assert!(check(&request, HOST, Some(&hash(HASH_A))).is_ok(), "{path}");
        }
    }

    // ── Structural failures surface through the pipeline ─────────────────────

    #[test]
    fn duplicate_t_tag_fails_even_with_valid_signature() {
        let token = upload_token().tag("t", "upload");
        let request = put_upload(header(token));
        assert_eq!(
            check(&request, HOST, Some(&hash(HASH_A))),
            Err(AuthError::DuplicateTag { tag: "t" })
        );
    }

    /// A malformed `x` tag does not widen the token to a wildcard.
    #[test]
    fn malformed_x_tag_does_not_authorize() {
        let token = EventBuilder::new(KIND_BLOSSOM_AUTH)
            .tag("t", "get")
            .tag("expiration", (NOW + 60).to_string())
            .tag("x", "not-a-hash")
            .tag("x", HASH_A);
        let request = RequestParts::new("GET", &format!("/{HASH_B}"))
            .with_authorization(header(token));

        assert!(matches!(
            check(&request, HOST, Some(&hash(HASH_B))),
            Err(AuthError::HashNotAuthorized { .. })
        ));
    }

    /// Truncated or padded signatures and keys are rejected, never a panic.
    #[test]
    fn wrong_length_signature_or_pubkey_is_rejected() {
        let signed = signer().sign(upload_token(), NOW).unwrap();

        for len in [2, 63, 65] {
            let mut event = signed.clone();
            event.sig = "11".repeat(len);
            let request = put_upload(encode_header(&event).unwrap());
            match check(&request, HOST, Some(&hash(HASH_A))) {
                Err(AuthError::InvalidSignature { reason }) => {
                    assert!(reason.contains(&format!("got {len}")), "{reason}")
                }
                other => panic!("expected InvalidSignature for {len}-byte sig, got {:?}", other),
            }
        }

        let mut event = signed;
        event.pubkey = "ab".repeat(31);
        event.id = compute_id(&event);
        let request = put_upload(encode_header(&event).unwrap());
        match check(&request, HOST, Some(&hash(HASH_A))) {
            Err(AuthError::InvalidSignature { reason }) => assert!(reason.contains("got 31"), "{reason}"),
            other => panic!("expected InvalidSignature for short pubkey, got {:?}", other),
        }
    }

    /// Rejections carry the failing stage into the client-facing reason.
    #[test]
    fn rejection_reason_names_the_stage() {
        let request = put_upload(header(upload_token()));
        let err = authenticator()
            .authenticate_at(&request, "evil.example", Some(&hash(HASH_A)), now())
            .unwrap_err();

        assert_eq!(err.stage(), Some(AuthStage::Validate));
        let reply = BlossomError::from(err);
        assert_eq!(reply.code, 401);
        assert!(reply.reason.starts_with("auth failed during validate: "), "{}", reply.reason);
    }

    #[test]
    fn token_from_the_future_is_rejected() {
        let event = signer().sign(upload_token(), NOW + 60).unwrap();
        let request = put_upload(encode_header(&event).unwrap());
        assert_eq!(
            check(&request, HOST, Some(&hash(HASH_A))),
            Err(AuthError::CreatedInFuture)
        );
    }

    // ── http::Request ─────────────────────────────────────────────────────────

    #[test]
    fn http_request_is_authorized_like_request_parts() {
        let request = http::Request::builder()
            .method("PUT")
            .uri("https://cdn.example.com/upload")
            .header("authorization", header(upload_token()))
            .body(())
            .unwrap();

        assert_eq!(
            authenticator().authenticate_at(&request, HOST, Some(&hash(HASH_A)), now()),
            Ok(Some(signer().public_key()))
        );
    }

    // ── Concurrency ───────────────────────────────────────────────────────────

    #[test]
    fn authenticator_is_shareable_across_threads() {
        let auth = Arc::new(authenticator());
        let request = Arc::new(put_upload(header(upload_token())));
        let expected = signer().public_key();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let auth = Arc::clone(&auth);
                let request = Arc::clone(&request);
                thread::spawn(move || {
                    auth.authenticate_at(&*request, HOST, Some(&hash(HASH_A)), now())
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(Some(expected.clone())));
        }
    }
}
