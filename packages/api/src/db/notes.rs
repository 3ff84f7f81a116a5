use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use store::repo::Result;
use store::{Note, NoteDraft, NoteStore, StoreError, User};

/// Database backed user
#[derive(FromRow)]
struct SqlUser {
    id: i64,
    username: String,
    password_hash: String,
}

impl From<SqlUser> for User {
    fn from(row: SqlUser) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

/// Database backed note
#[derive(FromRow)]
struct SqlNote {
    id: i64,
    title: String,
    text: String,
    slug: String,
    author_id: i64,
}

impl From<SqlNote> for Note {
    fn from(row: SqlNote) -> Self {
        Note {
            id: row.id,
            title: row.title,
            text: row.text,
            slug: row.slug,
            author_id: row.author_id,
        }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// NoteStore over a SQLite pool.
#[derive(Clone, Debug)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for SqlStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        sqlx::query_as::<_, SqlUser>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map(User::from)
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::UsernameTaken(username.to_string())
            } else {
                backend(e)
            }
        })
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user: Option<SqlUser> =
            sqlx::query_as("SELECT id, username, password_hash FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(user.map(User::from))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user: Option<SqlUser> =
            sqlx::query_as("SELECT id, username, password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(user.map(User::from))
    }

    async fn create_note(&self, author_id: i64, draft: &NoteDraft) -> Result<Note> {
        sqlx::query_as::<_, SqlNote>(
            "INSERT INTO notes (title, text, slug, author_id) VALUES ($1, $2, $3, $4)
             RETURNING id, title, text, slug, author_id",
        )
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(&draft.slug)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map(Note::from)
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::SlugTaken(draft.slug.clone())
            } else {
                backend(e)
            }
        })
    }

    async fn notes_by_author(&self, author_id: i64) -> Result<Vec<Note>> {
        let notes: Vec<SqlNote> = sqlx::query_as(
            "SELECT id, title, text, slug, author_id FROM notes WHERE author_id = $1 ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(notes.into_iter().map(Note::from).collect())
    }

    async fn note_for_author(&self, slug: &str, author_id: i64) -> Result<Option<Note>> {
        let note: Option<SqlNote> = sqlx::query_as(
            "SELECT id, title, text, slug, author_id FROM notes WHERE slug = $1 AND author_id = $2",
        )
        .bind(slug)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(note.map(Note::from))
    }

    async fn slug_in_use(&self, slug: &str, exclude: Option<i64>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notes WHERE slug = $1 AND ($2 IS NULL OR id != $2)",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;
        Ok(count > 0)
    }

    async fn update_note(&self, id: i64, draft: &NoteDraft) -> Result<Note> {
        let note: Option<SqlNote> = sqlx::query_as(
            "UPDATE notes SET title = $1, text = $2, slug = $3 WHERE id = $4
             RETURNING id, title, text, slug, author_id",
        )
        .bind(&draft.title)
        .bind(&draft.text)
        .bind(&draft.slug)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::SlugTaken(draft.slug.clone())
            } else {
                backend(e)
            }
        })?;
        note.map(Note::from).ok_or(StoreError::NotFound(id))
    }

    async fn delete_note(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn count_notes(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(count as usize)
    }
}
