//! backend-relay forwards API calls from a web site to its backend.
//!
//! Every request under a fixed local prefix is re-issued against a
//! configured backend origin with the same method, path below the prefix,
//! query string, headers (minus connection-specific ones), and body. The
//! backend's response comes back with its status, headers (minus
//! transport ones), and body. When the backend cannot be reached the
//! caller gets a `502` with a fixed JSON error body.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- The [`RelayConfig`](config::RelayConfig) value and its validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- The relay: header filtering, body representation, and the
//!   upstream call.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sentry-integration` | Sentry error tracking |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
