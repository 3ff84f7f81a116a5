//! # Session identity and the login gate
//!
//! A logged-in session carries the user's id under [`SESSION_USER_ID_KEY`].
//! Two extractors read it back:
//!
//! | Extractor | Anonymous request |
//! |-----------|-------------------|
//! | [`CurrentUser`] | Rejected with `302` to the login page, `next` set to the requested path and query. |
//! | [`Viewer`] | Accepted as `Viewer(None)`, for public pages that only adapt their navigation. |
//!
//! A session whose user has since disappeared counts as anonymous.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use store::User;
use tower_sessions::Session;

use crate::error::AppError;
use crate::routes;
use crate::AppState;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Resolve the session to a user, if any.
pub async fn session_user(session: &Session, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(user_id) = session.get::<i64>(SESSION_USER_ID_KEY).await? else {
        return Ok(None);
    };
    Ok(state.store.user_by_id(user_id).await?)
}

/// Bind the session to `user`, issuing a fresh session id.
pub async fn log_in(session: &Session, user: &User) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user.id).await?;
    tracing::info!(username = %user.username, "user logged in");
    Ok(())
}

/// Forget everything stored in the session.
pub async fn log_out(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

async fn load(parts: &mut Parts, state: &AppState) -> Result<Option<User>, Response> {
    let session = Session::from_request_parts(parts, state)
        .await
        .map_err(IntoResponse::into_response)?;
    session_user(&session, state)
        .await
        .map_err(IntoResponse::into_response)
}

/// The logged-in user. Anonymous requests are sent to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match load(parts, state).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or_else(|| parts.uri.path());
                tracing::debug!(next, "anonymous request redirected to login");
                Err(routes::found(routes::login_url(next)))
            }
        }
    }
}

/// Whoever is looking at a public page, logged in or not.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<User>);

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Viewer(load(parts, state).await?))
    }
}
