//! # blossy-contracts
//!
//! Shared types, wire formats, and error types for the blossy authorization
//! stack.
//!
//! All crates in the workspace import from here. No verification or parsing
//! logic lives in this crate, only data definitions and error types.

pub mod blob;
pub mod capability;
pub mod error;
pub mod event;
pub mod hash;
pub mod request;

pub use capability::{Action, AuthClaim, Capability};
pub use error::{AuthError, AuthResult, AuthStage, BlossomError, ErrorCategory};
pub use event::SignedEvent;
pub use hash::ResourceHash;
