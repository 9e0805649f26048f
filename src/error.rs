//! Unified error types for the relay.
//!
//! Defines [`RelayError`] (the main crate error enum) and
//! [`ValidationError`] for configuration problems. Both use `thiserror`
//! for `Display` and `Error` derives. [`RelayError::UpstreamUnreachable`]
//! renders as the fixed 502 JSON body and [`RelayError::PayloadTooLarge`]
//! as a plain 413.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Message carried in the `error` field of every relay failure response.
pub const PROXY_FAILURE_MESSAGE: &str = "Failed to proxy request to backend";

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any failure building, sending, or reading a relayed exchange.
    #[error("{source}")]
    UpstreamUnreachable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The inbound body exceeded the configured size limit.
    #[error("length limit exceeded")]
    PayloadTooLarge,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

impl RelayError {
    pub fn upstream(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::UpstreamUnreachable {
            source: source.into(),
        }
    }

    /// Classify a failure reading the inbound body. A body cut off by the
    /// size limit is the caller's fault, everything else is relay failure.
    pub fn body<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(e) = cause {
            if e.is::<http_body_util::LengthLimitError>() {
                return Self::PayloadTooLarge;
            }
            cause = e.source();
        }
        Self::upstream(err)
    }

    /// Whether this error means the backend exchange itself failed.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnreachable { .. })
    }
}

/// JSON body of a relay failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProxyFailure {
    pub error: String,
    pub details: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if matches!(self, Self::PayloadTooLarge) {
            // Same answer RequestBodyLimitLayer gives a declared oversized body.
            return (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()).into_response();
        }

        let status = match self {
            Self::UpstreamUnreachable { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ProxyFailure {
            error: PROXY_FAILURE_MESSAGE.to_string(),
            details: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
