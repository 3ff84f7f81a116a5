//! # Note pages
//!
//! Every handler here takes [`CurrentUser`], so anonymous visitors never get
//! past the login redirect. Pages for a single note go through [`owned_note`]:
//! a slug that does not exist and a slug that belongs to someone else both end
//! in `404`, and nothing is written in either case.
//!
//! Successful create, edit and delete requests redirect to `notes:success`.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use minijinja::{context, Value};
use store::{Note, User};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::forms::{slug_conflict, FormErrors, FormRejection, NoteForm};
use crate::routes;
use crate::AppState;

/// Fetch a note by slug for its author only.
pub async fn owned_note(state: &AppState, slug: &str, user: &User) -> Result<Note, AppError> {
    state
        .store
        .note_for_author(slug, user.id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(slug, username = %user.username, "no such note for requester");
            AppError::NotFound
        })
}

fn render_form(
    state: &AppState,
    user: &User,
    action: String,
    form: &NoteForm,
    errors: &FormErrors,
    note: Option<&Note>,
) -> Result<Response, AppError> {
    let page = state.templates.render(
        "notes/form.html",
        context! {
            user => user.to_info(),
            action => Value::from_safe_string(action),
            form,
            errors,
            note,
        },
    )?;
    Ok(page.into_response())
}

fn rejected(
    state: &AppState,
    user: &User,
    action: String,
    form: &NoteForm,
    note: Option<&Note>,
    rejection: FormRejection,
) -> Result<Response, AppError> {
    match rejection {
        FormRejection::Invalid(errors) => render_form(state, user, action, form, &errors, note),
        FormRejection::Failed(e) => Err(e),
    }
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, AppError> {
    let notes = state.store.notes_by_author(user.id).await?;
    state.templates.render(
        "notes/list.html",
        context! { user => user.to_info(), object_list => notes },
    )
}

pub async fn add_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    render_form(
        &state,
        &user,
        routes::NOTES_ADD.to_string(),
        &NoteForm::default(),
        &FormErrors::default(),
        None,
    )
}

pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let action = routes::NOTES_ADD.to_string();
    let draft = match form.validate(state.store.as_ref(), None).await {
        Ok(draft) => draft,
        Err(rejection) => return rejected(&state, &user, action, &form, None, rejection),
    };

    match state.store.create_note(user.id, &draft).await {
        Ok(note) => {
            tracing::info!(slug = %note.slug, username = %user.username, "note created");
            Ok(routes::found(routes::NOTES_SUCCESS))
        }
        Err(err) => rejected(&state, &user, action, &form, None, slug_conflict(err)),
    }
}

pub async fn success(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Html<String>, AppError> {
    state
        .templates
        .render("notes/success.html", context! { user => user.to_info() })
}

pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let note = owned_note(&state, &slug, &user).await?;
    state.templates.render(
        "notes/detail.html",
        context! { user => user.to_info(), note },
    )
}

pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = owned_note(&state, &slug, &user).await?;
    render_form(
        &state,
        &user,
        routes::note_edit(&note.slug),
        &NoteForm::from_note(&note),
        &FormErrors::default(),
        Some(&note),
    )
}

pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let note = owned_note(&state, &slug, &user).await?;
    let action = routes::note_edit(&note.slug);
    let draft = match form.validate(state.store.as_ref(), Some(&note)).await {
        Ok(draft) => draft,
        Err(rejection) => return rejected(&state, &user, action, &form, Some(&note), rejection),
    };

    match state.store.update_note(note.id, &draft).await {
        Ok(updated) => {
            tracing::info!(
                old_slug = %note.slug,
                slug = %updated.slug,
                username = %user.username,
                "note updated"
            );
            Ok(routes::found(routes::NOTES_SUCCESS))
        }
        Err(err) => rejected(&state, &user, action, &form, Some(&note), slug_conflict(err)),
    }
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let note = owned_note(&state, &slug, &user).await?;
    state.templates.render(
        "notes/delete.html",
        context! { user => user.to_info(), note },
    )
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = owned_note(&state, &slug, &user).await?;
    state.store.delete_note(note.id).await?;
    tracing::info!(slug = %note.slug, username = %user.username, "note deleted");
    Ok(routes::found(routes::NOTES_SUCCESS))
}
