//! # blossy-event
//!
//! Transport and integrity layer for signed capability tokens.
//!
//! ## Overview
//!
//! A token arrives as `Authorization: Nostr <base64 JSON event>`. This crate
//! turns the header into a [`SignedEvent`](blossy_contracts::SignedEvent)
//! and proves the event is intact:
//!
//! 1. [`extract_event`]: scheme check, base64 variant detection, JSON.
//! 2. [`verify_event`]: the `id` binds the content and the BIP-340 `sig`
//!    over the `id` validates against `pubkey`.
//!
//! It knows nothing about what the tags mean. That is left to the
//! kind-specific parsers in `blossy-auth`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blossy_event::{extract_event, verify_event};
//!
//! let event = extract_event(request.header("Authorization"))?;
//! verify_event(&event)?;
//! ```

pub mod codec;
pub mod extract;
pub mod sign;
pub mod verify;

pub use codec::decode_base64;
pub use extract::{extract_event, SCHEME};
pub use sign::{encode_header, EventBuilder, EventSigner, SignError};
pub use verify::{compute_id, verify_event};

// ── Tests ─────────────────────────────────────────────────────────────────────
