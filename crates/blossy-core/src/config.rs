//! Server configuration loaded from TOML.
//!
//! ```toml
//! hostname = "cdn.example.com"
//! base_url = "https://cdn.example.com"
//!
//! [http]
//! read_header_timeout_secs = 5
//! idle_timeout_secs = 120
//! shutdown_timeout_secs = 5
//! ```
//!
//! `hostname` is the value tokens must name in their `server` tags. Every
//! other field has a default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use blossy_contracts::{
    error::{ConfigError, ConfigResult},
    hash::ResourceHash,
};

use crate::path::validate_hostname;

const MIN_READ_HEADER_TIMEOUT_SECS: u64 = 1;
const MIN_IDLE_TIMEOUT_SECS: u64 = 10;
const MIN_SHUTDOWN_TIMEOUT_SECS: u64 = 1;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Hostname this server authorizes tokens for, e.g. `cdn.example.com`.
    pub hostname: String,

    /// Public base URL used to build blob descriptor URLs.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub http: HttpSettings,
}

/// Timeouts for the HTTP listener, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    pub read_header_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            read_header_timeout_secs: 5,
            idle_timeout_secs: 120,
            shutdown_timeout_secs: 5,
        }
    }
}

impl HttpSettings {
    pub fn read_header_timeout(&self) -> Duration {
        Duration::from_secs(self.read_header_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    fn validate(&self) -> ConfigResult<()> {
        let checks = [
            (
                "http.read_header_timeout_secs",
                self.read_header_timeout_secs,
                MIN_READ_HEADER_TIMEOUT_SECS,
            ),
            (
                "http.idle_timeout_secs",
                self.idle_timeout_secs,
                MIN_IDLE_TIMEOUT_SECS,
            ),
            (
                "http.shutdown_timeout_secs",
                self.shutdown_timeout_secs,
                MIN_SHUTDOWN_TIMEOUT_SECS,
            ),
        ];
        for (field, value, min) in checks {
            if value < min {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be at least {min}s, got {value}s"),
                });
            }
        }
        Ok(())
    }
}

impl ServerConfig {
    /// A config for `hostname` with default settings and no base URL.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            base_url: None,
            http: HttpSettings::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Parse `s` as TOML and validate the result.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: ServerConfig = toml::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML server configuration.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check every field. Logs a warning when no base URL is configured.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_hostname(&self.hostname).map_err(|reason| ConfigError::Invalid {
            field: "hostname",
            reason,
        })?;

        match self.base_url.as_deref() {
            None | Some("") => {
                warn!("server base url is not set, blob descriptor urls must be filled in by the host");
            }
            Some(base) => {
                let parsed = url::Url::parse(base).map_err(|e| ConfigError::Invalid {
                    field: "base_url",
                    reason: e.to_string(),
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::Invalid {
                        field: "base_url",
                        reason: format!("scheme must be http or https, got '{}'", parsed.scheme()),
                    });
                }
            }
        }

        self.http.validate()
    }

    /// Public URL of the blob `hash`, with an optional file extension.
    pub fn derive_url(&self, hash: &ResourceHash, ext: Option<&str>) -> ConfigResult<String> {
        let base = match self.base_url.as_deref() {
            Some(base) if !base.is_empty() => base.trim_end_matches('/'),
            _ => return Err(ConfigError::MissingBaseUrl),
        };
        Ok(match ext {
            Some(ext) if !ext.is_empty() => format!("{base}/{hash}.{ext}"),
            _ => format!("{base}/{hash}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"hostname = "cdn.example.com""#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = ServerConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.hostname, "cdn.example.com");
        assert_eq!(config.base_url, None);
        assert_eq!(config.http, HttpSettings::default());
        assert_eq!(config.http.idle_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn full_config_parses() {
        let toml = r#"
            hostname = "localhost:3000"
            base_url = "http://localhost:3000"

            [http]
            read_header_timeout_secs = 2
            idle_timeout_secs = 30
            shutdown_timeout_secs = 3
        "#;
        let config = ServerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.http.read_header_timeout(), Duration::from_secs(2));
        assert_eq!(config.http.shutdown_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn hostname_with_scheme_is_rejected() {
        match ServerConfig::from_toml_str(r#"hostname = "https://cdn.example.com""#) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "hostname"),
            other => panic!("expected Invalid hostname, got {:?}", other),
        }
    }

    #[test]
    fn missing_hostname_is_a_parse_error() {
        assert!(matches!(
            ServerConfig::from_toml_str(r#"base_url = "https://x.com""#),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let toml = r#"
            hostname = "cdn.example.com"
            base_url = "ftp://cdn.example.com"
        "#;
        match ServerConfig::from_toml_str(toml) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "base_url"),
            other => panic!("expected Invalid base_url, got {:?}", other),
        }
    }

    #[test]
    fn timeouts_below_minimum_are_rejected() {
        let toml = r#"
            hostname = "cdn.example.com"

            [http]
            idle_timeout_secs = 9
        "#;
        match ServerConfig::from_toml_str(toml) {
            Err(ConfigError::Invalid { field, reason }) => {
                assert_eq!(field, "http.idle_timeout_secs");
                assert!(reason.contains("10s"), "reason: {reason}");
            }
            other => panic!("expected Invalid idle timeout, got {:?}", other),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml = r#"
            hostname = "cdn.example.com"
            hostnmae = "typo"
        "#;
        assert!(matches!(
            ServerConfig::from_toml_str(toml),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        match ServerConfig::from_file(Path::new("/nonexistent/blossy.toml")) {
            Err(ConfigError::Read { path, .. }) => assert!(path.ends_with("blossy.toml")),
            other => panic!("expected Read error, got {:?}", other),
        }
    }

    // ── derive_url ───────────────────────────────────────────────────────────

    #[test]
    fn derive_url_joins_base_hash_and_extension() {
        let config = ServerConfig::new("cdn.example.com").with_base_url("https://cdn.example.com/");
        let hash = ResourceHash::from_bytes([0xab; 32]);

        assert_eq!(
            config.derive_url(&hash, Some("png")).unwrap(),
            format!("https://cdn.example.com/{}.png", "ab".repeat(32))
        );
        assert_eq!(
            config.derive_url(&hash, None).unwrap(),
            format!("https://cdn.example.com/{}", "ab".repeat(32))
        );
    }

    #[test]
    fn derive_url_without_base_fails() {
        let config = ServerConfig::new("cdn.example.com");
        assert!(matches!(
            config.derive_url(&ResourceHash::ZERO, None),
            Err(ConfigError::MissingBaseUrl)
        ));
    }
}
