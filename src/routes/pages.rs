//! Home page and the pages rendered straight from configuration.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::Markup;
use tracing::{info, warn};

use crate::render::pages;
use crate::state::AppState;

/// Number of repositories featured on the landing page.
pub const TOP_REPOS: usize = 4;

pub async fn home(State(state): State<AppState>) -> Markup {
    let live = async {
        match &state.live {
            Some(source) => source.live_status().await,
            None => None,
        }
    };
    let (top, live) = tokio::join!(state.repos.top(TOP_REPOS), live);

    info!(top = top.len(), live = live.is_some(), "rendering home page");
    pages::home(&state.config, &top, live.as_ref())
}

pub async fn skills(State(state): State<AppState>) -> Markup {
    pages::skills(&state.config)
}

pub async fn about(State(state): State<AppState>) -> Markup {
    pages::about(&state.config)
}

pub async fn testimonials(State(state): State<AppState>) -> Markup {
    pages::testimonials(&state.config)
}

pub async fn upload_form(State(state): State<AppState>) -> Markup {
    pages::upload(&state.config)
}

/// 404 page for anything no route or static file matched.
pub async fn not_found(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> Response {
    warn!(path = %uri.path(), "404 not found");
    not_found_page(&state)
}

pub fn not_found_page(state: &AppState) -> Response {
    (StatusCode::NOT_FOUND, pages::not_found(&state.config)).into_response()
}
