//! # Domain models for users and notes
//!
//! Defines the records handed out by every [`crate::NoteStore`] implementation.
//! They are `Serialize` so the view layer can pass them straight into templates.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A registered account. Carries the Argon2 `password_hash`, so it never leaves the server. |
//! | [`UserInfo`] | The template-safe projection of a [`User`] (id and username only). |
//! | [`Note`] | A stored note: `title`, `text`, the globally unique `slug`, and the owning `author_id`. |
//! | [`NoteDraft`] | A validated `title`/`text`/`slug` triple, produced by the note form and consumed by create/update. |
//!
//! A note's `author_id` is fixed when the note is created. Updates take a
//! [`NoteDraft`], which has no author field, so there is no way to reassign one.

use serde::{Deserialize, Serialize};

/// Full user record, including the password hash.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl User {
    /// Convert to UserInfo for rendering.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// User information safe to put in a page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
}

/// A note owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub text: String,
    /// Unique across all notes, not just the author's.
    pub slug: String,
    pub author_id: i64,
}

impl Note {
    /// Whether `user_id` owns this note.
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// Validated note fields ready to be written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }
}
