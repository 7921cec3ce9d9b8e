//! Blob reports (NIP-56 kind-1984 events sent to `PUT /report`).

use tracing::debug;

use blossy_contracts::{
    blob::{Report, ReportedBlob},
    error::BlossomError,
    event::{SignedEvent, KIND_REPORT},
    hash::ResourceHash,
};
use blossy_event::verify_event;

/// Normalize a verified kind-1984 event into a [`Report`].
///
/// Each `x` tag holding a valid hash names one blob; its optional third
/// element is the reason. A report naming no valid blob is rejected.
pub fn parse_report(event: &SignedEvent) -> Result<Report, BlossomError> {
    if event.kind != KIND_REPORT {
        return Err(BlossomError::bad_request(format!(
            "report event kind must be {KIND_REPORT}, got {}",
            event.kind
        )));
    }

    let blobs: Vec<ReportedBlob> = event
        .tags
        .iter()
        .filter(|tag| tag.len() >= 2 && tag[0] == "x")
        .filter_map(|tag| match ResourceHash::parse(&tag[1]) {
            Ok(hash) => Some(ReportedBlob {
                hash,
                reason: tag.get(2).cloned().unwrap_or_default(),
            }),
            Err(e) => {
                debug!(value = %tag[1], error = %e, "skipping malformed 'x' tag in report");
                None
            }
        })
        .collect();

    if blobs.is_empty() {
        return Err(BlossomError::bad_request(
            "report must reference at least one blob in a valid 'x' tag",
        ));
    }

    Ok(Report {
        pubkey: event.pubkey.clone(),
        blobs,
        content: event.content.clone(),
    })
}

/// Decode a `PUT /report` body, verify its signature and parse it.
pub fn report_from_body(body: &[u8]) -> Result<Report, BlossomError> {
    let event: SignedEvent = serde_json::from_slice(body)
        .map_err(|e| BlossomError::bad_request(format!("invalid report event json: {e}")))?;
    verify_event(&event)?;
    parse_report(&event)
}
