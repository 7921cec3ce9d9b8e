//! Protocol data types exchanged with blob-server hooks.

use serde::{Deserialize, Serialize};

use crate::hash::ResourceHash;

/// Description of a stored blob, returned by upload and mirror endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDescriptor {
    /// Public URL of the blob. Derived from the server base URL when empty.
    pub url: String,
    pub sha256: ResourceHash,
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Unix seconds.
    pub uploaded: i64,
}

/// Client-reported facts about an upload.
///
/// Useful for early rejection, never to be trusted: every field is whatever
/// the client chose to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadHints {
    pub hash: Option<ResourceHash>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
}

/// One blob named in a report, with the reporter's reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedBlob {
    pub hash: ResourceHash,
    pub reason: String,
}

/// Normalized form of a NIP-56 report received by a blob server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub pubkey: String,
    pub blobs: Vec<ReportedBlob>,
    pub content: String,
}

impl Report {
    /// Hashes of every reported blob, in report order.
    pub fn hashes(&self) -> Vec<ResourceHash> {
        self.blobs.iter().map(|b| b.hash).collect()
    }
}
