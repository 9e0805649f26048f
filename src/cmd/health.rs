//! `backend-relay health` — check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use std::time::Duration;

use http_body_util::{BodyExt, Full};
use tower::ServiceExt;

use crate::cli::HealthArgs;
use crate::error::RelayError;
use crate::health::HealthResponse;
use crate::server;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), RelayError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri = url
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| RelayError::UriParse {
            source: Box::new(e),
        })?;

    let req = hyper::Request::builder()
        .uri(uri)
        .body(Full::new(bytes::Bytes::new()))
        .map_err(|e| RelayError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(HEALTH_TIMEOUT, server::build_http_client().oneshot(req))
        .await
        .map_err(|_| RelayError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| RelayError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| RelayError::HttpRequest { source: e })?
        .to_bytes();

    if !status.is_success() {
        return Err(RelayError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print_summary(&args.url, &health),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn print_summary(url: &str, health: &HealthResponse) {
    let timeout = health
        .relay
        .upstream_timeout_ms
        .map_or_else(|| "none".to_string(), |ms| format!("{ms}ms"));
    println!("\u{2713} backend-relay is healthy ({url})");
    println!("  version:          {}", health.version);
    println!("  uptime:           {}", format_uptime(health.uptime_seconds));
    println!("  backend:          {}", health.relay.backend);
    println!("  prefix:           {}", health.relay.prefix);
    println!("  upstream timeout: {timeout}");
    println!(
        "  requests:         {} relayed, {} failed",
        health.stats.requests_relayed, health.stats.requests_failed
    );
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
