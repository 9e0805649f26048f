//! `backend-relay run` — start the relay server.
//!
//! Builds the [`RelayConfig`] from flags and environment, then serves the
//! Axum router with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::RunArgs;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), RelayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_deref()
        .and_then(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let relay = RelayConfig::new(
        &args.backend,
        &args.prefix,
        args.upstream_timeout_ms.map(Duration::from_millis),
    )?;

    if relay.upstream_timeout.is_none() {
        tracing::debug!("no upstream timeout configured, a hung backend holds its request open");
    }

    let backend = relay.backend.clone();
    let pattern = relay.route_pattern();
    let state = Arc::new(AppState::new(relay));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        backend = %backend,
        route = %pattern,
        "backend-relay started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("backend-relay stopped");
    Ok(())
}
