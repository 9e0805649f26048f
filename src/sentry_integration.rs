//! Optional Sentry error tracking.
//!
//! Relay failures are logged at `error` level, and the `sentry-tracing`
//! layer installed by [`logging::init`](crate::logging::init) turns those
//! events into Sentry issues once the client below is running. Hold the
//! returned guard for the lifetime of the process.

pub fn init(dsn: &str, environment: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = match dsn.parse() {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled");
            return None;
        }
    };

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        environment: environment.map(|e| e.to_string().into()),
        release: Some(concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION")).into()),
        attach_stacktrace: true,
        ..Default::default()
    });
    tracing::info!("sentry error tracking enabled");
    Some(guard)
}
