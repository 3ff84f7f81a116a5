use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::{Note, NoteDraft, User};
use crate::repo::{NoteStore, Result, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    notes: Vec<Note>,
    next_user_id: i64,
    next_note_id: i64,
}

impl Tables {
    fn slug_taken(&self, slug: &str, exclude: Option<i64>) -> bool {
        self.notes
            .iter()
            .any(|note| note.slug == slug && Some(note.id) != exclude)
    }
}

/// In-memory NoteStore for testing and local demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_note(&self, author_id: i64, draft: &NoteDraft) -> Result<Note> {
        let mut tables = self.tables()?;
        if !tables.users.iter().any(|u| u.id == author_id) {
            return Err(StoreError::Backend(format!("unknown author {author_id}")));
        }
        if tables.slug_taken(&draft.slug, None) {
            return Err(StoreError::SlugTaken(draft.slug.clone()));
        }
        tables.next_note_id += 1;
        let note = Note {
            id: tables.next_note_id,
            title: draft.title.clone(),
            text: draft.text.clone(),
            slug: draft.slug.clone(),
            author_id,
        };
        tables.notes.push(note.clone());
        Ok(note)
    }

    async fn notes_by_author(&self, author_id: i64) -> Result<Vec<Note>> {
        Ok(self
            .tables()?
            .notes
            .iter()
            .filter(|note| note.is_authored_by(author_id))
            .cloned()
            .collect())
    }

    async fn note_for_author(&self, slug: &str, author_id: i64) -> Result<Option<Note>> {
        Ok(self
            .tables()?
            .notes
            .iter()
            .find(|note| note.slug == slug && note.is_authored_by(author_id))
            .cloned())
    }

    async fn slug_in_use(&self, slug: &str, exclude: Option<i64>) -> Result<bool> {
        Ok(self.tables()?.slug_taken(slug, exclude))
    }

    async fn update_note(&self, id: i64, draft: &NoteDraft) -> Result<Note> {
        let mut tables = self.tables()?;
        if tables.slug_taken(&draft.slug, Some(id)) {
            return Err(StoreError::SlugTaken(draft.slug.clone()));
        }
        let note = tables
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(StoreError::NotFound(id))?;
        note.title = draft.title.clone();
        note.text = draft.text.clone();
        note.slug = draft.slug.clone();
        Ok(note.clone())
    }

    async fn delete_note(&self, id: i64) -> Result<()> {
        let mut tables = self.tables()?;
        let before = tables.notes.len();
        tables.notes.retain(|note| note.id != id);
        if tables.notes.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn count_notes(&self) -> Result<usize> {
        Ok(self.tables()?.notes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (MemoryStore, User, User) {
        let store = MemoryStore::new();
        let author = store.create_user("IceFrog", "hash").await.unwrap();
        let reader = store.create_user("IamGroot", "hash").await.unwrap();
        (store, author, reader)
    }

    #[tokio::test]
    async fn test_create_and_list_notes() {
        let (store, author, reader) = seeded().await;

        // Initially empty
        assert!(store.notes_by_author(author.id).await.unwrap().is_empty());

        store
            .create_note(author.id, &NoteDraft::new("First", "Text", "first"))
            .await
            .unwrap();
        store
            .create_note(reader.id, &NoteDraft::new("Other", "Text", "other"))
            .await
            .unwrap();

        let notes = store.notes_by_author(author.id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].slug, "first");
        assert_eq!(notes[0].author_id, author.id);
        assert_eq!(store.count_notes().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (store, _, _) = seeded().await;
        let err = store.create_user("IceFrog", "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(name) if name == "IceFrog"));
    }

    #[tokio::test]
    async fn test_slug_unique_across_authors() {
        let (store, author, reader) = seeded().await;
        store
            .create_note(author.id, &NoteDraft::new("Title", "Text", "test_slug"))
            .await
            .unwrap();

        let err = store
            .create_note(reader.id, &NoteDraft::new("Title", "Text", "test_slug"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(slug) if slug == "test_slug"));
        assert_eq!(store.count_notes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_note_for_author_hides_foreign_notes() {
        let (store, author, reader) = seeded().await;
        store
            .create_note(author.id, &NoteDraft::new("Title", "Text", "test_slug"))
            .await
            .unwrap();

        assert!(store
            .note_for_author("test_slug", author.id)
            .await
            .unwrap()
            .is_some());
        // Someone else's note looks exactly like a missing one
        assert!(store
            .note_for_author("test_slug", reader.id)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .note_for_author("missing", author.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_author_and_allows_own_slug() {
        let (store, author, _) = seeded().await;
        let note = store
            .create_note(author.id, &NoteDraft::new("Title", "Text", "test_slug"))
            .await
            .unwrap();

        assert!(!store.slug_in_use("test_slug", Some(note.id)).await.unwrap());
        assert!(store.slug_in_use("test_slug", None).await.unwrap());

        let updated = store
            .update_note(note.id, &NoteDraft::new("New Title", "New Text", "test_slug"))
            .await
            .unwrap();
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.text, "New Text");
        assert_eq!(updated.author_id, author.id);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_slug() {
        let (store, author, reader) = seeded().await;
        store
            .create_note(reader.id, &NoteDraft::new("A", "Text", "taken"))
            .await
            .unwrap();
        let mine = store
            .create_note(author.id, &NoteDraft::new("B", "Text", "mine"))
            .await
            .unwrap();

        let err = store
            .update_note(mine.id, &NoteDraft::new("B", "Text", "taken"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(_)));
        let unchanged = store.note_for_author("mine", author.id).await.unwrap();
        assert_eq!(unchanged.map(|n| n.title), Some("B".to_string()));
    }

    #[tokio::test]
    async fn test_delete_note() {
        let (store, author, _) = seeded().await;
        let first = store
            .create_note(author.id, &NoteDraft::new("First", "Text", "first"))
            .await
            .unwrap();
        store
            .create_note(author.id, &NoteDraft::new("Second", "Text", "second"))
            .await
            .unwrap();

        store.delete_note(first.id).await.unwrap();

        let notes = store.notes_by_author(author.id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].slug, "second");
        assert!(matches!(
            store.delete_note(first.id).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
