//! Project listing and detail pages backed by the repository cache.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use maud::Markup;
use tracing::{info, warn};

use crate::render::pages;
use crate::state::AppState;

use super::pages::not_found_page;

pub async fn list(State(state): State<AppState>) -> Markup {
    let repos = state.repos.repositories().await;
    info!(count = repos.len(), "rendering projects page");
    pages::projects(&state.config, &repos)
}

pub async fn detail(State(state): State<AppState>, Path(repo_name): Path<String>) -> Response {
    match state.repos.find(&repo_name).await {
        Some(repo) => {
            info!(repo = %repo.name, "rendering project detail");
            pages::project_detail(&state.config, &repo).into_response()
        }
        None => {
            warn!(repo = %repo_name, "project not found");
            not_found_page(&state)
        }
    }
}
