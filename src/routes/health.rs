//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    repos_cached_at: Option<DateTime<Utc>>,
    repo_refreshes: u64,
}

/// Returns basic service health for load balancers.
///
/// Never triggers a repository refresh.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        repos_cached_at: state.repos.cached_at().await,
        repo_refreshes: state.repos.refresh_count(),
    })
}
