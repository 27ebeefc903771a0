//! EMY upstream HTTP client.

use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::UpstreamError;
use crate::metrics;

use super::types::{extract_records, EmyRecord};

/// Client for the upstream EMY patient endpoint.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct EmyClient {
    /// HTTP client for upstream requests.
    http: reqwest::Client,
    /// Upstream endpoint URL.
    url: String,
    /// Whether certificate verification is disabled.
    accept_invalid_certs: bool,
}

impl EmyClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        if config.accept_invalid_certs {
            warn!(
                url = %config.emypatient,
                "TLS certificate verification is DISABLED for the EMY upstream"
            );
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http,
            url: config.emypatient.clone(),
            accept_invalid_certs: config.accept_invalid_certs,
        })
    }

    /// Get the upstream URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether certificate verification is disabled.
    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Fetch the EMY records, re-indexed into a list.
    ///
    /// The upstream status code is logged but otherwise ignored: a non-2xx
    /// response with a well-formed body is still a success.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_patients(&self) -> Result<Vec<EmyRecord>, UpstreamError> {
        let start = Instant::now();
        let result = self.fetch_inner().await;
        metrics::record_upstream_latency(start);

        match &result {
            Ok(records) => {
                metrics::inc_upstream_success();
                debug!(count = records.len(), "Fetched EMY records");
            }
            Err(e) => metrics::inc_upstream_failure(e.kind()),
        }

        result
    }

    async fn fetch_inner(&self) -> Result<Vec<EmyRecord>, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "Upstream returned non-success status");
        }

        let body = response.bytes().await.map_err(UpstreamError::Body)?;
        debug!(status = %status, bytes = body.len(), "Received upstream body");

        extract_records(&body)
    }
}

/// Connect, TLS, timeout and request failures are `Request`; anything else
/// (malformed URL, redirect loops) falls through to `Unexpected`.
fn classify_send_error(e: reqwest::Error) -> UpstreamError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        UpstreamError::Request(e)
    } else {
        UpstreamError::Unexpected(e.to_string())
    }
}
