//! # Database module — SQLite pool and the sqlx-backed note store
//!
//! - [`connect`] opens a pool from [`DatabaseSettings`](crate::settings::DatabaseSettings),
//!   creating the database file when it is missing.
//! - [`in_memory`] opens a private `sqlite::memory:` database on a single
//!   connection that is never recycled, so the data outlives individual queries.
//! - [`migrate`] applies the embedded migrations under `migrations/`.
//! - [`SqlStore`] implements [`store::NoteStore`] on top of the pool. Slug and
//!   username uniqueness come from `UNIQUE` indexes; violations are reported as
//!   [`store::StoreError::SlugTaken`] / [`store::StoreError::UsernameTaken`].

mod notes;
mod pool;

pub use notes::SqlStore;
pub use pool::{connect, in_memory, migrate};
