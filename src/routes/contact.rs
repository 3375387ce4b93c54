//! Contact form: empty on GET, validated and mailed on POST.
//!
//! Every outcome renders with status 200; the page itself carries the result.

use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use maud::Markup;
use tracing::warn;

use crate::contact::{self, ContactForm, ContactView};
use crate::render::pages;
use crate::state::AppState;

pub async fn form(State(state): State<AppState>) -> Markup {
    pages::contact(&state.config, &ContactView::empty())
}

/// A body that is not a urlencoded form counts as a blank submission.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Markup {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "unreadable contact form body");
            ContactForm::default()
        }
    };
    let view = contact::submit(form, state.mailer.as_ref()).await;
    pages::contact(&state.config, &view)
}
