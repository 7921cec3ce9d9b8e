//! Blob paths, blob URLs and hostnames.

use blossy_contracts::{
    error::BlossomError,
    hash::{HashError, ResourceHash},
};

/// Split a blob path into its hash and optional extension.
///
/// One leading `/` is stripped. Everything after the first `.` is the
/// extension, so `<hash>.tar.gz` yields `tar.gz`.
pub fn parse_hash_ext(path: &str) -> Result<(ResourceHash, Option<&str>), HashError> {
    let p = path.strip_prefix('/').unwrap_or(path);
    let (hex, ext) = match p.split_once('.') {
        Some((hex, ext)) => (hex, Some(ext)),
        None => (p, None),
    };
    Ok((ResourceHash::parse(hex)?, ext))
}

/// Check that `raw` is an absolute URL whose path names a blob, returning
/// that blob's hash.
pub fn validate_blob_url(raw: &str) -> Result<ResourceHash, BlossomError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| BlossomError::bad_request(format!("invalid url '{raw}': {e}")))?;
    let (hash, _) = parse_hash_ext(parsed.path())
        .map_err(|e| BlossomError::bad_request(format!("url '{raw}' does not name a blob: {e}")))?;
    Ok(hash)
}

/// Check that `hostname` is a bare host, optionally with a port.
///
/// Schemes, paths, queries, fragments and userinfo are all rejected. The
/// error is a human-readable reason.
pub fn validate_hostname(hostname: &str) -> Result<(), String> {
    if hostname.is_empty() {
        return Err("hostname must not be empty".to_string());
    }
    if hostname.contains("://") {
        return Err(format!(
            "hostname must not include a scheme (use \"cdn.example.com\", not \"https://cdn.example.com\"), got '{hostname}'"
        ));
    }

    let not_bare = || {
        format!("hostname must be a bare domain without path, query, or fragment, got '{hostname}'")
    };
    if hostname.contains(['/', '\\', '?', '#', '@']) {
        return Err(not_bare());
    }

    let parsed = url::Url::parse(&format!("http://{hostname}"))
        .map_err(|e| format!("invalid hostname '{hostname}': {e}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| format!("invalid hostname '{hostname}'"))?;

    // Compare against the raw authority: the parser drops a default port,
    // so `localhost:80` comes back without one.
    let (Some(raw_host), Some(raw_port)) = (hostname.get(..host.len()), hostname.get(host.len()..))
    else {
        return Err(not_bare());
    };
    if !raw_host.eq_ignore_ascii_case(host) {
        return Err(not_bare());
    }
    match raw_port.strip_prefix(':') {
        None if raw_port.is_empty() => {}
        Some(port) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {}
        _ => return Err(not_bare()),
    }
    Ok(())
}
