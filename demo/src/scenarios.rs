//! End-to-end authorization scenarios.
//!
//! Each scenario signs a fresh token with a fixed demo key, sends it through
//! the full pipeline and checks the outcome against what a Blossom server
//! must decide.

use chrono::Utc;
use tracing::info;

use blossy_contracts::{
    error::{AuthError, BlossomError},
    event::KIND_BLOSSOM_AUTH,
    hash::ResourceHash,
    request::RequestParts,
};
use blossy_core::{Authenticator, ServerConfig};
use blossy_event::{encode_header, EventBuilder, EventSigner};

const DEMO_SECRET: &str = "7f7ff03d123792d6ac594bfa67bf6d0c0ab55b6b1fdb6249303fe861f1ccba9a";
const HASH_A: &str = "b1674191a88ec5cdd733e4240a81803105dc412d6c6708d53ab94fc248f4f553";
const HASH_B: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

const SERVER_CONFIG: &str = r#"
hostname = "cdn.example.com"
base_url = "https://cdn.example.com"
"#;

struct Scenario {
    name: &'static str,
    request: RequestParts,
    hash: Option<ResourceHash>,
    expect: Result<(), AuthError>,
}

/// Run every scenario, stopping at the first unexpected outcome.
pub fn run_all() -> Result<(), BlossomError> {
    let config = ServerConfig::from_toml_str(SERVER_CONFIG)
        .map_err(|e| BlossomError::internal(e.to_string()))?;
    let signer = EventSigner::from_hex(DEMO_SECRET)
        .map_err(|e| BlossomError::internal(e.to_string()))?;
    let auth: Authenticator = blossy_auth::authenticator();
    let now = Utc::now().timestamp();

    let hash_a = parse_hash(HASH_A)?;
    let hash_b = parse_hash(HASH_B)?;

    let upload = EventBuilder::new(KIND_BLOSSOM_AUTH)
        .tag("t", "upload")
        .tag("expiration", (now + 300).to_string())
        .tag("x", HASH_A)
        .tag("server", config.hostname.as_str())
        .content("Upload blob");
    let upload_header = sign(&signer, upload, now)?;

    let expired = EventBuilder::new(KIND_BLOSSOM_AUTH)
        .tag("t", "get")
        .tag("expiration", (now - 60).to_string());
    let expired_header = sign(&signer, expired, now - 120)?;

    let scenarios = vec![
        Scenario {
            name: "upload token for its own blob",
            request: RequestParts::new("PUT", "/upload").with_authorization(upload_header.clone()),
            hash: Some(hash_a),
            expect: Ok(()),
        },
        Scenario {
            name: "upload token for another blob",
            request: RequestParts::new("PUT", "/upload").with_authorization(upload_header.clone()),
            hash: Some(hash_b),
            expect: Err(AuthError::HashNotAuthorized {
                expected: Some(hash_b),
            }),
        },
        Scenario {
            name: "upload token used to delete",
            request: RequestParts::new("DELETE", format!("/{HASH_A}"))
                .with_authorization(upload_header),
            hash: Some(hash_a),
            expect: Err(AuthError::WrongAction {
                expected: blossy_contracts::Action::Delete,
                actual: blossy_contracts::Action::Upload,
            }),
        },
        Scenario {
            name: "expired get token",
            request: RequestParts::new("GET", format!("/{HASH_B}.txt"))
                .with_authorization(expired_header),
            hash: Some(hash_b),
            expect: Err(AuthError::Expired),
        },
        Scenario {
            name: "basic auth header",
            request: RequestParts::new("GET", "/list/abc").with_authorization("Basic abc123"),
            hash: None,
            expect: Err(AuthError::InvalidScheme),
        },
    ];

    for scenario in &scenarios {
        let result = auth
            .authenticate(&scenario.request, &config.hostname, scenario.hash.as_ref())
            .map(|_| ());
        if let Err(e) = &result {
            println!("  {}: rejected ({}) {e}", scenario.name, e.status_code());
        }
        let outcome = result.map_err(AuthError::into_root);
        let verdict = if outcome == scenario.expect { "ok" } else { "UNEXPECTED" };
        println!("[{verdict}] {}", scenario.name);
        if outcome != scenario.expect {
            return Err(BlossomError::internal(format!(
                "scenario '{}' expected {:?}, got {:?}",
                scenario.name, scenario.expect, outcome
            )));
        }
    }

    let url = config
        .derive_url(&hash_a, Some("png"))
        .map_err(|e| BlossomError::internal(e.to_string()))?;
    info!(%url, "descriptor url for uploaded blob");
    println!("All {} scenarios behaved as expected.", scenarios.len());
    Ok(())
}

fn parse_hash(hex: &str) -> Result<ResourceHash, BlossomError> {
    ResourceHash::parse(hex).map_err(|e| BlossomError::internal(e.to_string()))
}

fn sign(signer: &EventSigner, builder: EventBuilder, created_at: i64) -> Result<String, BlossomError> {
    let event = signer
        .sign(builder, created_at)
        .map_err(|e| BlossomError::internal(e.to_string()))?;
    encode_header(&event).map_err(|e| BlossomError::internal(e.to_string()))
}
