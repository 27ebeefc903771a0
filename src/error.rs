//! Unified error types for the display server.

use strum::IntoStaticStr;
use thiserror::Error;

/// Process-level error type: startup, configuration and serving.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Upstream client could not be built.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream fetch failed outside of a request (CLI diagnostics).
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the upstream EMY fetch.
///
/// Every variant is reported to the caller as the same generic failure
/// envelope; the variant only drives logging and metrics.
#[derive(Error, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum UpstreamError {
    /// Connect, TLS or timeout failure while sending the request.
    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body is not JSON.
    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body is JSON but not an object.
    #[error("upstream body is not a JSON object (got {found})")]
    NotAnObject {
        /// JSON type that was received instead.
        found: &'static str,
    },

    /// The expected field is absent.
    #[error("upstream body has no `{field}` field")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The field exists but is neither an object nor an array.
    #[error("upstream field `{field}` is a {found}, expected an object")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// JSON type that was received instead.
        found: &'static str,
    },

    /// Anything not classified above.
    #[error("unexpected upstream failure: {0}")]
    Unexpected(String),
}

impl UpstreamError {
    /// Short, stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Whether the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request(e) | Self::Body(e) => e.is_timeout(),
            _ => false,
        }
    }
}
