//! A plain description of an inbound HTTP request.
//!
//! Authorization needs the method, the path and the `Authorization` header;
//! upload checks also read a few client hints. Hosts that don't use the
//! `http` crate can describe their request with [`RequestParts`] instead.

use serde::{Deserialize, Serialize};

/// Name of the header carrying the token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Owned method, path and headers of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParts {
    /// Upper-case HTTP method, e.g. `"PUT"`.
    pub method: String,
    /// Absolute request path, e.g. `"/upload"`.
    pub path: String,
    /// Raw value of the `Authorization` header, if sent.
    pub authorization: Option<String>,
    /// Any other headers, in the order they were sent.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl RequestParts {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            authorization: None,
            headers: Vec::new(),
        }
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Append a header. Repeated names keep every value; lookups see the
    /// first.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of the named header, matched case-insensitively.
    ///
    /// The `authorization` field, when set, answers for `Authorization`.
    pub fn header(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
            if let Some(value) = self.authorization.as_deref() {
                return Some(value);
            }
        }
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
