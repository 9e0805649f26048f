//! Shared helpers: a mock backend and a relay started on ephemeral ports.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Request};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use backend_relay::config::RelayConfig;
use backend_relay::server::{self, AppState};

/// What the mock backend saw.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: String,
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}

async fn echo(req: Request) -> Json<Echo> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    Json(Echo {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        headers: header_map(&parts.headers),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

async fn upload(mut multipart: Multipart) -> Json<Vec<UploadedPart>> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        parts.push(UploadedPart {
            name: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(String::from),
            content_type: field.content_type().map(String::from),
            data: String::from_utf8_lossy(&field.bytes().await.unwrap()).into_owned(),
        });
    }
    Json(parts)
}

async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, [("x-brew", "earl-grey")], "short and stout")
}

async fn transport_headers() -> impl IntoResponse {
    (
        [
            ("content-encoding", "identity"),
            ("connection", "close"),
            ("x-kept", "yes"),
        ],
        "payload",
    )
}

async fn binary() -> impl IntoResponse {
    (
        [("content-type", "application/octet-stream")],
        vec![0_u8, 159, 146, 150, 255],
    )
}

/// Long enough to clear the compression size threshold.
pub fn gzipped_text() -> String {
    "relayed text ".repeat(20)
}

async fn gzipped() -> String {
    gzipped_text()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "too late"
}

pub async fn start_mock_backend() -> SocketAddr {
    let router = Router::new()
        .route("/upload", post(upload))
        .route("/teapot", get(teapot))
        .route("/transport-headers", get(transport_headers))
        .route("/binary", get(binary))
        .route("/slow", get(slow))
        .route(
            "/gzipped",
            get(gzipped).layer(tower_http::compression::CompressionLayer::new()),
        )
        .fallback(echo);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub async fn start_relay(config: RelayConfig) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState::new(config));
    let router = server::build_router(state, 1_048_576);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, shutdown_tx)
}

/// Relay under `/api/proxy` pointed at `backend`.
pub async fn start_relay_to(
    backend: SocketAddr,
    timeout: Option<Duration>,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let config = RelayConfig::new(&format!("http://{backend}/"), "/api/proxy", timeout).unwrap();
    start_relay(config).await
}
