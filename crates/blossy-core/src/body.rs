//! Size-limited request body reading.

use std::io::Read;

use blossy_contracts::error::BlossomError;

/// Read at most `limit` bytes from `reader`.
///
/// A body of exactly `limit` bytes is accepted. Anything longer fails with
/// 413 without reading past `limit + 1` bytes; I/O failures are 400.
pub fn read_no_more<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>, BlossomError> {
    let mut data = Vec::new();
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut data)
        .map_err(|e| BlossomError::bad_request(format!("failed to read body: {e}")))?;

    if data.len() > limit {
        return Err(BlossomError::too_large("body too large"));
    }
    Ok(data)
}
