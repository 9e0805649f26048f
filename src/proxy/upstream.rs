//! The outbound half of a relayed exchange.
//!
//! [`upstream_url`] maps a destination path onto the backend origin and
//! [`send`] performs the call, collecting the whole response body so it
//! can be classified into a [`Payload`].

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::ext::ReasonPhrase;
use tower::ServiceExt;

use super::headers::relayed_response_headers;
use super::payload::Payload;
use crate::error::RelayError;
use crate::server::HttpClient;

#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Present only when the upstream sent a non-canonical status text.
    pub reason: Option<ReasonPhrase>,
    pub headers: HeaderMap,
    pub payload: Payload,
    /// HEAD, 204 and 304 answers: no body was sent, whatever the headers say.
    pub bodiless: bool,
}

/// Build `<backend>/<path>[?<query>]`. An empty query adds no `?`.
#[must_use]
pub fn upstream_url(backend: &str, path: &str, query: Option<&str>) -> String {
    let path = path.trim_start_matches('/');
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{backend}/{path}?{query}"),
        None => format!("{backend}/{path}"),
    }
}

/// Perform the upstream call. When `timeout` is set it bounds the whole
/// exchange, body included.
pub async fn send(
    client: &HttpClient,
    method: Method,
    url: &str,
    headers: HeaderMap,
    body: Bytes,
    timeout: Option<Duration>,
) -> Result<UpstreamResponse, RelayError> {
    let head = method == Method::HEAD;
    let mut req = hyper::Request::builder()
        .method(method)
        .uri(url)
        .body(Full::new(body))
        .map_err(RelayError::upstream)?;
    *req.headers_mut() = headers;

    let exchange = async {
        let response = client
            .clone()
            .oneshot(req)
            .await
            .map_err(RelayError::upstream)?;
        let (parts, body) = response.into_parts();
        let collected = body.collect().await.map_err(RelayError::upstream)?;
        Ok::<_, RelayError>((parts, collected.to_bytes()))
    };

    let (parts, bytes) = match timeout {
        Some(limit) => tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| {
                RelayError::upstream(format!(
                    "upstream did not respond within {}ms",
                    limit.as_millis()
                ))
            })??,
        None => exchange.await?,
    };

    let bodiless = head
        || parts.status == StatusCode::NO_CONTENT
        || parts.status == StatusCode::NOT_MODIFIED;

    Ok(UpstreamResponse {
        bodiless,
        status: parts.status,
        reason: parts.extensions.get::<ReasonPhrase>().cloned(),
        payload: Payload::from_response(&parts.headers, bytes),
        headers: parts.headers,
    })
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.payload.encode().bytes));
        *response.status_mut() = self.status;
        *response.headers_mut() = relayed_response_headers(&self.headers, self.bodiless);
        if let Some(reason) = self.reason {
            response.extensions_mut().insert(reason);
        }
        response
    }
}
