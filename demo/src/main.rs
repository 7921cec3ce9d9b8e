//! blossy demo CLI
//!
//! Mints Blossom authorization tokens, checks them against a request, and
//! runs self-contained end-to-end scenarios.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- mint --secret <hex> --action upload --hash <sha256> --server cdn.example.com
//!   cargo run -p demo -- check --method PUT --path /upload --hostname cdn.example.com --header "Nostr ..."

mod scenarios;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use blossy_contracts::{
    capability::Action,
    error::BlossomError,
    event::KIND_BLOSSOM_AUTH,
    hash::ResourceHash,
    request::RequestParts,
};
use blossy_core::ServerConfig;
use blossy_event::{encode_header, EventBuilder, EventSigner};

// ── CLI definition ────────────────────────────────────────────────────────────

/// blossy: capability-token authorization for blob servers.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "blossy authorization demo",
    long_about = "Mints and checks Blossom (kind 24242) authorization tokens,\n\
                  and runs end-to-end authorization scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,

    /// Sign a token and print its Authorization header value.
    Mint {
        /// Hex secret key (64 characters).
        #[arg(long)]
        secret: String,
        /// Action to grant: get, upload, list or delete.
        #[arg(long)]
        action: Action,
        /// Seconds until the token expires.
        #[arg(long, default_value_t = 300)]
        expires_in: i64,
        /// Restrict the token to this blob. Repeatable.
        #[arg(long = "hash")]
        hashes: Vec<ResourceHash>,
        /// Restrict the token to this server hostname. Repeatable.
        #[arg(long = "server")]
        servers: Vec<String>,
        /// Human-readable description.
        #[arg(long, default_value = "")]
        content: String,
    },

    /// Authorize a request and print the principal.
    Check {
        #[arg(long)]
        method: String,
        #[arg(long)]
        path: String,
        /// Authorization header value. Omit to test the unauthenticated path.
        #[arg(long)]
        header: Option<String>,
        /// Hostname of the serving server. Taken from --config when omitted.
        #[arg(long)]
        hostname: Option<String>,
        /// Server config TOML file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Blob the request targets.
        #[arg(long)]
        hash: Option<ResourceHash>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => scenarios::run_all(),
        Command::Mint {
            secret,
            action,
            expires_in,
            hashes,
            servers,
            content,
        } => mint(&secret, action, expires_in, &hashes, &servers, content),
        Command::Check {
            method,
            path,
            header,
            hostname,
            config,
            hash,
        } => check(method, path, header, hostname, config, hash),
    };

    if let Err(e) = result {
        eprintln!("error ({}): {}", e.code, e.reason);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn mint(
    secret: &str,
    action: Action,
    expires_in: i64,
    hashes: &[ResourceHash],
    servers: &[String],
    content: String,
) -> Result<(), BlossomError> {
    let signer =
        EventSigner::from_hex(secret).map_err(|e| BlossomError::bad_request(e.to_string()))?;
    let now = Utc::now().timestamp();

    let mut builder = EventBuilder::new(KIND_BLOSSOM_AUTH)
        .tag("t", action.as_str())
        .tag("expiration", (now + expires_in).to_string())
        .content(content);
    for hash in hashes {
        builder = builder.tag("x", hash.to_hex());
    }
    for server in servers {
        builder = builder.tag("server", server.as_str());
    }

    let event = signer
        .sign(builder, now)
        .map_err(|e| BlossomError::internal(e.to_string()))?;
    let header = encode_header(&event).map_err(|e| BlossomError::internal(e.to_string()))?;

    println!("pubkey: {}", event.pubkey);
    println!("{header}");
    Ok(())
}

fn check(
    method: String,
    path: String,
    header: Option<String>,
    hostname: Option<String>,
    config: Option<PathBuf>,
    hash: Option<ResourceHash>,
) -> Result<(), BlossomError> {
    let hostname = match (hostname, config) {
        (Some(hostname), _) => hostname,
        (None, Some(path)) => {
            ServerConfig::from_file(&path)
                .map_err(|e| BlossomError::bad_request(e.to_string()))?
                .hostname
        }
        (None, None) => {
            return Err(BlossomError::bad_request(
                "either --hostname or --config is required",
            ))
        }
    };

    let mut request = RequestParts::new(method.to_ascii_uppercase(), path);
    request.authorization = header;

    match blossy_auth::authenticate(&request, &hostname, hash.as_ref())? {
        Some(pubkey) => println!("authorized: {pubkey}"),
        None => println!("unauthenticated: no Authorization header"),
    }
    Ok(())
}
