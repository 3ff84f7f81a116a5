pub mod models;
pub mod repo;
pub mod slug;

mod memory;
pub use memory::MemoryStore;

pub use models::{Note, NoteDraft, User, UserInfo};
pub use repo::{NoteStore, StoreError};
pub use slug::slugify;
