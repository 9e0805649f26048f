//! Header filtering across the relay boundary.
//!
//! [`outbound_headers`] copies the inbound request headers minus the
//! connection-specific set that must not be replayed to another origin.
//! [`relayed_response_headers`] copies the upstream response headers minus
//! the transport headers the outer delivery layer recomputes.

use std::sync::LazyLock;

use axum::http::{header, HeaderMap, HeaderName};

static EXCLUDED_REQUEST: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    ["host", "connection", "keep-alive", "transfer-encoding"]
        .iter()
        .filter_map(|name| name.parse::<HeaderName>().ok())
        .collect()
});

static EXCLUDED_RESPONSE: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    ["content-encoding", "transfer-encoding", "connection"]
        .iter()
        .filter_map(|name| name.parse::<HeaderName>().ok())
        .collect()
});

/// Headers to send upstream for an inbound request.
///
/// `content-length` is dropped as well: the body may be re-encoded on the
/// way out and the client sets the length of what it actually sends.
#[must_use]
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    for name in EXCLUDED_REQUEST.iter() {
        headers.remove(name);
    }
    headers.remove(header::CONTENT_LENGTH);
    headers
}

/// Headers to return to the caller for an upstream response.
///
/// The body has been fully collected by the time these are applied, so
/// `content-length` from the origin may no longer describe it; axum sets
/// the correct value from the delivered bytes. A `bodiless` response (HEAD,
/// 204, 304) carries no bytes to measure, so the origin's value is kept.
#[must_use]
pub fn relayed_response_headers(upstream: &HeaderMap, bodiless: bool) -> HeaderMap {
    let mut headers = upstream.clone();
    for name in EXCLUDED_RESPONSE.iter() {
        headers.remove(name);
    }
    if !bodiless {
        headers.remove(header::CONTENT_LENGTH);
    }
    headers
}

/// Whether a `content-type` header value contains `needle`, ignoring case.
#[must_use]
pub fn content_type_contains(headers: &HeaderMap, needle: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains(needle))
}
