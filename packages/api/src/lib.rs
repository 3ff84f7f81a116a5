//! # API crate — the notes web application
//!
//! Everything the server needs except `main`: configuration, persistence,
//! authentication, forms, templates and the HTTP handlers, tied together by
//! [`router`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2 password hashing, session identity, the [`auth::CurrentUser`] login gate |
//! | [`db`] | SQLite pool, embedded migrations and [`db::SqlStore`], the sqlx-backed [`store::NoteStore`] |
//! | [`error`] | [`AppError`] and its mapping onto HTTP responses |
//! | [`forms`] | Note, login and signup form validation, including slug derivation and the duplicate slug warning |
//! | [`routes`] | Named routes, `reverse` lookups and redirect helpers |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, `NOTES__*` environment) |
//! | [`templates`] | MiniJinja page templates |
//! | [`views`] | Request handlers |
//!
//! ## Access rules
//!
//! Anonymous visitors may only see the home page and the login, logout and
//! signup pages; every note page redirects them to login. Logged-in users
//! see and change only their own notes. Someone else's note answers `404`
//! exactly like a missing one.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use store::NoteStore;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

pub mod auth;
pub mod db;
pub mod error;
pub mod forms;
pub mod routes;
pub mod settings;
pub mod templates;
pub mod views;

pub use error::AppError;
pub use settings::Settings;

use settings::SessionSettings;
use templates::Templates;
use views::{notes, users};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoteStore>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(store: Arc<dyn NoteStore>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            store,
            templates: Arc::new(Templates::new()?),
        })
    }
}

/// Session cookie configuration for the given session store.
pub fn session_layer<S>(sessions: S, settings: &SessionSettings) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(sessions)
        .with_secure(settings.secure)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            settings.inactivity_days,
        )))
}

/// Build the application with all routes, sessions and request tracing.
pub fn router<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route(routes::HOME, get(views::home))
        .route(routes::NOTES_LIST, get(notes::list))
        .route(routes::NOTES_ADD, get(notes::add_form).post(notes::add))
        .route(routes::NOTES_SUCCESS, get(notes::success))
        .route(routes::NOTES_DETAIL, get(notes::detail))
        .route(routes::NOTES_EDIT, get(notes::edit_form).post(notes::edit))
        .route(
            routes::NOTES_DELETE,
            get(notes::delete_confirm)
                .post(notes::delete)
                .delete(notes::delete),
        )
        .route(routes::LOGIN, get(users::login_form).post(users::login))
        .route(routes::LOGOUT, get(users::logout).post(users::logout))
        .route(routes::SIGNUP, get(users::signup_form).post(users::signup))
        .fallback(views::not_found)
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
