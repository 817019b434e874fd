//! Ghost is a programmable HTTP stand-in server.
//!
//! Clients register mocks, each pairing an expected request (endpoint,
//! verb, headers, body) with a canned response, and the server answers
//! live HTTP requests by finding the matching mock. Requests that match
//! no mock, or that miss an expected header or body field, get a
//! structured JSON error explaining why.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, health).
//! - [`error`] -- Process errors and request-facing rejections using `thiserror`.
//! - [`handler`] -- The catch-all mock responder, request matching,
//!   response rendering, and the `/load/mock` loader.
//! - [`health`] -- `GET /_ghost/health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`mock`] -- Mock model, the synchronized registry, validation, and
//!   bundles via the [`Mocker`](mock::Mocker) trait.
//! - [`server`] -- Axum router, shared application state, and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML mock file support _(enabled by default)_ |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod error;
pub mod handler;
pub mod health;
pub mod logging;
pub mod mock;
pub mod server;
