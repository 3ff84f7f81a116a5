use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use store::StoreError;
use thiserror::Error;

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html>
<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Not found</title></head>
<body><h1>Not found</h1><p>The requested page does not exist.</p></body></html>";

const SERVER_ERROR_PAGE: &str = "<!DOCTYPE html>
<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Server error</title></head>
<body><h1>Server error</h1><p>Something went wrong, please try again later.</p></body></html>";

/// Errors a request handler can end with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing page, or a note the requester does not own.
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("password hashing error: {0}")]
    Password(#[from] argon2::password_hash::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
            }
        }
    }
}
