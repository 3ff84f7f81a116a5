//! # Form parsing and validation
//!
//! Each form is a `Deserialize` struct filled from an urlencoded body. Missing
//! fields default to empty strings so that an incomplete submission re-renders
//! with field errors instead of being rejected by the extractor.
//!
//! | Form | Validates into |
//! |------|----------------|
//! | [`NoteForm`] | [`NoteDraft`], deriving the slug from the title when it is left blank and enforcing slug uniqueness. |
//! | [`LoginForm`] | The matching [`User`], or a form-wide error that does not reveal which half was wrong. |
//! | [`SignupForm`] | A username and password ready to be stored. |
//!
//! Failures come back as [`FormRejection::Invalid`] carrying [`FormErrors`]
//! (field name to messages), which the views put back into the page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use store::{slugify, Note, NoteDraft, NoteStore, StoreError, User};

use crate::auth;
use crate::error::AppError;

/// Appended to a slug that another note already uses.
pub const WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_SLUG_LENGTH: usize = 100;
pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MIN_PASSWORD_LENGTH: usize = 8;

const REQUIRED: &str = "This field is required.";

/// Field name to error messages. `"form"` holds errors not tied to one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The duplicate slug error.
    pub fn slug_taken(slug: &str) -> Self {
        let mut errors = Self::default();
        errors.add("slug", format!("{slug}{WARNING}"));
        errors
    }
}

/// Why a submitted form was not accepted.
#[derive(Debug)]
pub enum FormRejection {
    /// The input is wrong; show the form again.
    Invalid(FormErrors),
    /// The check itself failed.
    Failed(AppError),
}

impl From<AppError> for FormRejection {
    fn from(e: AppError) -> Self {
        FormRejection::Failed(e)
    }
}

impl From<StoreError> for FormRejection {
    fn from(e: StoreError) -> Self {
        FormRejection::Failed(e.into())
    }
}

impl From<argon2::password_hash::Error> for FormRejection {
    fn from(e: argon2::password_hash::Error) -> Self {
        FormRejection::Failed(e.into())
    }
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Create and edit form for a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteForm {
    /// Prefilled with an existing note, for the edit page.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }

    /// Check the fields and settle the slug.
    ///
    /// `editing` is the note being changed, whose own slug does not count as taken.
    pub async fn validate(
        &self,
        store: &dyn NoteStore,
        editing: Option<&Note>,
    ) -> Result<NoteDraft, FormRejection> {
        let mut errors = FormErrors::default();
        let title = self.title.trim();
        let text = self.text.trim();
        let slug = self.slug.trim();

        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            errors.add(
                "title",
                format!("Make sure the title has at most {MAX_TITLE_LENGTH} characters."),
            );
        }
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let slug = if slug.is_empty() {
            let mut derived = slugify(title);
            derived.truncate(MAX_SLUG_LENGTH);
            if derived.is_empty() && !title.is_empty() {
                errors.add(
                    "slug",
                    "Could not build a slug from this title, please enter one.",
                );
            }
            derived
        } else {
            if !is_slug(slug) {
                errors.add(
                    "slug",
                    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
                );
            } else if slug.chars().count() > MAX_SLUG_LENGTH {
                errors.add(
                    "slug",
                    format!("Make sure the slug has at most {MAX_SLUG_LENGTH} characters."),
                );
            }
            slug.to_string()
        };

        if errors.get("slug").is_empty()
            && !slug.is_empty()
            && store.slug_in_use(&slug, editing.map(|note| note.id)).await?
        {
            errors.add("slug", format!("{slug}{WARNING}"));
        }

        if !errors.is_empty() {
            return Err(FormRejection::Invalid(errors));
        }
        Ok(NoteDraft::new(title, text, slug))
    }
}

/// Turn a racing duplicate from the store into the same error the pre-check gives.
pub fn slug_conflict(err: StoreError) -> FormRejection {
    match err {
        StoreError::SlugTaken(slug) => FormRejection::Invalid(FormErrors::slug_taken(&slug)),
        other => FormRejection::Failed(other.into()),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Where to go after logging in.
    #[serde(default)]
    pub next: String,
}

impl LoginForm {
    pub async fn authenticate(&self, store: &dyn NoteStore) -> Result<User, FormRejection> {
        let invalid = || {
            let mut errors = FormErrors::default();
            errors.add(
                "form",
                "Please enter a correct username and password. Note that both fields may be case-sensitive.",
            );
            FormRejection::Invalid(errors)
        };

        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(invalid());
        }
        let Some(user) = store.user_by_username(username).await? else {
            return Err(invalid());
        };
        if !auth::verify_password(&self.password, &user.password_hash)? {
            return Err(invalid());
        }
        Ok(user)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

impl SignupForm {
    /// Returns the trimmed username and the password to hash.
    pub async fn validate(&self, store: &dyn NoteStore) -> Result<(String, String), FormRejection> {
        let mut errors = FormErrors::default();
        let username = self.username.trim();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > MAX_USERNAME_LENGTH {
            errors.add(
                "username",
                format!("Ensure the username has at most {MAX_USERNAME_LENGTH} characters."),
            );
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        } else if store.user_by_username(username).await?.is_some() {
            errors.add("username", "A user with that username already exists.");
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else if self.password1.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password1",
                format!("This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."),
            );
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        if !errors.is_empty() {
            return Err(FormRejection::Invalid(errors));
        }
        Ok((username.to_string(), self.password1.clone()))
    }
}
