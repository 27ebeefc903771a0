//! EMY patient monitoring display server.
//!
//! Serves the page shells for the client-side display and proxies the
//! upstream EMY endpoint, re-indexing its keyed `emy` mapping into a list:
//!
//! ```text
//! upstream:  {"emy": {"a": {"id": 1}, "b": {"id": 2}}}
//! response:  {"status": "success", "data": [{"id": 1}, {"id": 2}]}
//! ```
//!
//! Any upstream failure becomes
//! `{"status": "failed", "message": "Internal error happened. Try again"}`,
//! always with HTTP 200.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`upstream`]: EMY client and payload transform
//! - [`pages`]: Page shell rendering
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pages;
pub mod upstream;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{AppError, UpstreamError};
