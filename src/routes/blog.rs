//! Blog listing and single posts.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use maud::Markup;
use tracing::{error, info};

use crate::blog;
use crate::render::pages;
use crate::state::AppState;

use super::pages::not_found_page;

pub async fn summary(State(state): State<AppState>) -> Markup {
    let posts = blog::list_posts(&state.config.paths.blog_dir)
        .await
        .unwrap_or_else(|err| {
            error!(error = %err, "failed to list blog posts");
            Vec::new()
        });
    info!(count = posts.len(), "rendering blog summary");
    pages::blog_summary(&state.config, &posts)
}

pub async fn post(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    match blog::read_post(&state.config.paths.blog_dir, &filename).await {
        Some(html) => {
            info!(post = %filename, "rendering blog post");
            pages::blog_post(&state.config, &html).into_response()
        }
        None => not_found_page(&state),
    }
}
