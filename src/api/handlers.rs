//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::Config;
use crate::metrics;
use crate::pages::{Component, PageShell};
use crate::upstream::EmyClient;
use crate::utils::error_chain;

use super::envelope::Envelope;

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upstream EMY client.
    pub client: EmyClient,
    /// Page shell settings.
    pub pages: Arc<PageShell>,
    /// Prometheus render handle, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from config.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: EmyClient::new(config)?,
            pages: Arc::new(PageShell::new(&config.app_title, &config.asset_version)),
            metrics: None,
        })
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// EMY patient data handler - always returns 200.
///
/// Failure is reported in the envelope only; the cause is logged and never
/// exposed to the caller.
pub async fn get_emy_patient(State(state): State<AppState>) -> Json<Envelope> {
    match state.client.fetch_patients().await {
        Ok(records) => {
            debug!(count = records.len(), "Serving EMY records");
            Json(Envelope::success(records))
        }
        Err(e) => {
            error!(
                error = %error_chain(&e),
                kind = e.kind(),
                timeout = e.is_timeout(),
                "Failed to fetch EMY patients"
            );
            Json(Envelope::failed())
        }
    }
}

/// Root page handler.
pub async fn root_page(State(state): State<AppState>, uri: OriginalUri) -> Html<String> {
    render_page(&state, Component::Test, &uri)
}

/// Display index page handler.
pub async fn display_index(State(state): State<AppState>, uri: OriginalUri) -> Html<String> {
    render_page(&state, Component::DisplayIndex, &uri)
}

fn render_page(state: &AppState, component: Component, uri: &OriginalUri) -> Html<String> {
    metrics::inc_page_renders(component.into());
    Html(state.pages.render(component, uri.0.path()))
}

/// Prometheus metrics handler - 404 when no recorder is installed.
pub async fn metrics_text(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}
