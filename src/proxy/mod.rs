//! The request relay.
//!
//! [`relay_handler`] is mounted under the configured prefix and forwards
//! every request, whatever its method, to the backend origin. Submodules
//! handle header filtering ([`headers`]), body representation
//! ([`payload`]), and the outbound call ([`upstream`]).

pub mod headers;
pub mod payload;
pub mod upstream;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::error::RelayError;
use crate::server::AppState;

use payload::Payload;
use upstream::UpstreamResponse;

pub async fn relay_handler(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    match relay(&state, req).await {
        Ok(response) => {
            state.stats.relayed.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = response.status.as_u16(),
                latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "request relayed"
            );
            response.into_response()
        }
        Err(RelayError::PayloadTooLarge) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                "request body over the size limit"
            );
            RelayError::PayloadTooLarge.into_response()
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %e,
                latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "failed to proxy request to backend"
            );
            e.into_response()
        }
    }
}

/// Forward one inbound request and return the upstream's answer.
pub async fn relay(state: &AppState, req: Request) -> Result<UpstreamResponse, RelayError> {
    let config = &state.relay;
    let url = upstream::upstream_url(
        &config.backend,
        destination_path(req.uri().path(), &config.prefix),
        req.uri().query(),
    );
    let method = req.method().clone();
    let mut headers = headers::outbound_headers(req.headers());

    let body = match Payload::from_request(req).await? {
        Some(payload) => {
            let encoded = payload.encode();
            if let Some(content_type) = encoded.content_type {
                headers.insert(header::CONTENT_TYPE, content_type);
            }
            encoded.bytes
        }
        None => Bytes::new(),
    };

    tracing::debug!(method = %method, upstream = %url, "forwarding request");

    upstream::send(
        &state.http_client,
        method,
        &url,
        headers,
        body,
        config.upstream_timeout,
    )
    .await
}

/// The raw (still percent-encoded) path below `prefix`.
#[must_use]
pub fn destination_path<'a>(path: &'a str, prefix: &str) -> &'a str {
    path.strip_prefix(prefix)
        .unwrap_or(path)
        .trim_start_matches('/')
}
