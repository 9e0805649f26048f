//! Relay configuration.
//!
//! [`RelayConfig`] is built once at startup from CLI flags and their
//! environment variable equivalents, validated by [`validation`], and
//! handed to the server as an explicit value. Nothing in the relay reads
//! the process environment per request.

pub mod validation;

use std::time::Duration;

use crate::error::RelayError;

/// Backend origin used when `NEXT_PUBLIC_BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

/// Local path prefix under which every request is relayed.
pub const DEFAULT_PREFIX: &str = "/api/proxy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Upstream origin with trailing slashes stripped.
    pub backend: String,
    /// Local prefix without a trailing slash; empty means the root.
    pub prefix: String,
    /// `None` waits on the upstream indefinitely.
    pub upstream_timeout: Option<Duration>,
}

impl RelayConfig {
    /// Validate and normalize the raw settings.
    pub fn new(
        backend: &str,
        prefix: &str,
        upstream_timeout: Option<Duration>,
    ) -> Result<Self, RelayError> {
        let backend = backend.trim();
        let prefix = prefix.trim();

        let mut errors = Vec::new();
        if let Err(e) = validation::validate_backend(backend) {
            errors.push(e);
        }
        if let Err(e) = validation::validate_prefix(prefix) {
            errors.push(e);
        }
        if upstream_timeout.is_some_and(|t| t.is_zero()) {
            errors.push(crate::error::ValidationError {
                field: "upstream_timeout".into(),
                message: "timeout must be greater than zero".into(),
                suggestion: Some("omit the flag to disable the timeout".into()),
            });
        }
        if !errors.is_empty() {
            return Err(RelayError::ConfigValidation { errors });
        }

        Ok(Self {
            backend: backend.trim_end_matches('/').to_string(),
            prefix: prefix.trim_end_matches('/').to_string(),
            upstream_timeout,
        })
    }

    /// Axum route pattern that captures the destination path.
    #[must_use]
    pub fn route_pattern(&self) -> String {
        format!("{}/{{*path}}", self.prefix)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND_URL.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            upstream_timeout: None,
        }
    }
}
