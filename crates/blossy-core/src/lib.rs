//! # blossy-core
//!
//! The request authorization pipeline for blossy blob servers.
//!
//! This crate provides:
//! - The seam traits (`AuthRequest`, `CapabilityParser`, `CapabilityValidator`)
//! - The `Authenticator` that runs extraction, verification, action
//!   resolution, parsing and validation in order
//! - Server configuration and the path, body and upload-hint helpers a host
//!   needs around it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blossy_core::{Authenticator, traits::{CapabilityParser, CapabilityValidator}};
//!
//! let auth = Authenticator::new(Box::new(validator)).with_parser(Box::new(parser));
//! let principal = auth.authenticate(&request, &config.hostname, Some(&hash))?;
//! ```

pub mod authenticator;
pub mod body;
pub mod config;
pub mod hints;
pub mod path;
pub mod resolver;
pub mod traits;

pub use authenticator::Authenticator;
pub use config::{HttpSettings, ServerConfig};
pub use traits::{AuthRequest, CapabilityParser, CapabilityValidator};
