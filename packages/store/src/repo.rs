//! # NoteStore — the persistence seam for users and notes
//!
//! Every read and write the web layer performs goes through the [`NoteStore`]
//! trait, so the same handlers run against the in-memory [`crate::MemoryStore`]
//! (unit tests, quick demos) and the SQLite-backed store in the `api` crate.
//!
//! ## Lookups
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`user_by_id`](NoteStore::user_by_id) / [`user_by_username`](NoteStore::user_by_username) | Resolve an account, `None` if absent. |
//! | [`notes_by_author`](NoteStore::notes_by_author) | Exactly the notes whose `author_id` matches, in creation order. |
//! | [`note_for_author`](NoteStore::note_for_author) | The ownership-scoped lookup: a note is returned only when **both** slug and author match. |
//! | [`slug_in_use`](NoteStore::slug_in_use) | Whether any note other than `exclude` already holds the slug. |
//! | [`count_notes`](NoteStore::count_notes) | Total number of notes across all users. |
//!
//! ## Writes
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`create_user`](NoteStore::create_user) | Fails with [`StoreError::UsernameTaken`] on a duplicate username. |
//! | [`create_note`](NoteStore::create_note) | Inserts a note for `author_id`; fails with [`StoreError::SlugTaken`] on a duplicate slug. |
//! | [`update_note`](NoteStore::update_note) | Rewrites title, text and slug in place. The author is never touched. |
//! | [`delete_note`](NoteStore::delete_note) | Removes a note by id. |
//!
//! Slug uniqueness is global. Implementations must enforce it themselves (a
//! unique index, a check under a lock) so two racing writes cannot both win;
//! [`slug_in_use`](NoteStore::slug_in_use) is only the friendly pre-check.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Note, NoteDraft, User};

/// Errors raised by a [`NoteStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slug `{0}` is already in use")]
    SlugTaken(String),
    #[error("username `{0}` is already taken")]
    UsernameTaken(String),
    #[error("note {0} does not exist")]
    NotFound(i64),
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Async storage for users and their notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;

    async fn user_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn create_note(&self, author_id: i64, draft: &NoteDraft) -> Result<Note>;

    async fn notes_by_author(&self, author_id: i64) -> Result<Vec<Note>>;

    /// Find a note by slug, but only if `author_id` wrote it.
    async fn note_for_author(&self, slug: &str, author_id: i64) -> Result<Option<Note>>;

    async fn slug_in_use(&self, slug: &str, exclude: Option<i64>) -> Result<bool>;

    async fn update_note(&self, id: i64, draft: &NoteDraft) -> Result<Note>;

    async fn delete_note(&self, id: i64) -> Result<()>;

    async fn count_notes(&self) -> Result<usize>;
}
