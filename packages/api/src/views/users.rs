use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use minijinja::context;
use serde::Deserialize;
use tower_sessions::Session;

use crate::auth::{self, Viewer};
use crate::error::AppError;
use crate::forms::{FormErrors, FormRejection, LoginForm, SignupForm};
use crate::routes;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    #[serde(default)]
    pub next: String,
}

fn render_login(
    state: &AppState,
    viewer: Option<store::User>,
    form: &LoginForm,
    errors: &FormErrors,
) -> Result<Response, AppError> {
    let page = state.templates.render(
        "users/login.html",
        context! {
            user => viewer.map(|user| user.to_info()),
            next => form.next,
            form,
            errors,
        },
    )?;
    Ok(page.into_response())
}

pub async fn login_form(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Query(params): Query<NextParam>,
) -> Result<Response, AppError> {
    let form = LoginForm {
        next: params.next,
        ..LoginForm::default()
    };
    render_login(&state, viewer, &form, &FormErrors::default())
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match form.authenticate(state.store.as_ref()).await {
        Ok(user) => user,
        Err(FormRejection::Invalid(errors)) => {
            tracing::info!(username = %form.username, "failed login attempt");
            return render_login(&state, None, &form, &errors);
        }
        Err(FormRejection::Failed(e)) => return Err(e),
    };

    auth::log_in(&session, &user).await?;
    let next = routes::safe_next(&form.next).unwrap_or(routes::HOME);
    Ok(routes::found(next))
}

/// Ends the session. Accepts GET as well as POST.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    auth::log_out(&session).await?;
    state
        .templates
        .render("users/logged_out.html", context! {})
}

pub async fn signup_form(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
) -> Result<Html<String>, AppError> {
    state.templates.render(
        "users/signup.html",
        context! {
            user => viewer.map(|user| user.to_info()),
            form => SignupForm::default(),
            errors => FormErrors::default(),
        },
    )
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let (username, password) = match form.validate(state.store.as_ref()).await {
        Ok(valid) => valid,
        Err(FormRejection::Invalid(errors)) => {
            let page = state.templates.render(
                "users/signup.html",
                context! { form, errors },
            )?;
            return Ok(page.into_response());
        }
        Err(FormRejection::Failed(e)) => return Err(e),
    };

    let hash = auth::hash_password(&password)?;
    match state.store.create_user(&username, &hash).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "user signed up");
            Ok(routes::found(routes::LOGIN))
        }
        Err(store::StoreError::UsernameTaken(_)) => {
            let mut errors = FormErrors::default();
            errors.add("username", "A user with that username already exists.");
            let page = state.templates.render(
                "users/signup.html",
                context! { form, errors },
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e.into()),
    }
}
