//! Request handlers, one module per area of the site.

pub mod notes;
pub mod users;

use axum::extract::State;
use axum::response::Html;
use minijinja::context;

use crate::auth::Viewer;
use crate::error::AppError;
use crate::AppState;

/// Public landing page.
pub async fn home(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
) -> Result<Html<String>, AppError> {
    state.templates.render(
        "home.html",
        context! { user => viewer.map(|user| user.to_info()) },
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
