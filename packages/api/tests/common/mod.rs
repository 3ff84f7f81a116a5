//! Test harness: a fresh application per test, driven through `tower::ServiceExt::oneshot`.
//!
//! [`TestApp`] owns the router and a handle to its store so tests can seed
//! users and notes directly and inspect the database afterwards. [`Client`]
//! plays a browser: it remembers the session cookie handed out at login.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use api::db::{self, SqlStore};
use api::{routes, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use store::{slugify, Note, NoteDraft, NoteStore, User};
use tower::ServiceExt;

pub const PASSWORD: &str = "Pro100 Password";

/// Hashing is slow on purpose; every test user shares one hash.
fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| api::auth::hash_password(PASSWORD).expect("hash test password"))
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn NoteStore>,
}

impl TestApp {
    /// Application over an in-memory SQLite database.
    pub async fn new() -> Self {
        let pool = db::in_memory().await.expect("open in-memory database");
        db::migrate(&pool).await.expect("run migrations");
        Self::with_store(Arc::new(SqlStore::new(pool)))
    }

    /// Application over [`store::MemoryStore`].
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(store::MemoryStore::new()))
    }

    fn with_store(store: Arc<dyn NoteStore>) -> Self {
        let state = AppState::new(store.clone()).expect("compile templates");
        let settings = api::Settings::from_toml("").expect("default settings");
        let sessions = api::session_layer(tower_sessions::MemoryStore::default(), &settings.session);
        Self {
            router: api::router(state, sessions),
            store,
        }
    }

    pub async fn create_user(&self, username: &str) -> User {
        self.store
            .create_user(username, password_hash())
            .await
            .expect("create user")
    }

    /// Seed a note directly; a missing slug is derived from the title.
    pub async fn create_note(
        &self,
        author: &User,
        title: &str,
        text: &str,
        slug: Option<&str>,
    ) -> Note {
        let slug = slug.map(str::to_string).unwrap_or_else(|| slugify(title));
        self.store
            .create_note(author.id, &NoteDraft::new(title, text, slug))
            .await
            .expect("create note")
    }

    pub async fn count_notes(&self) -> usize {
        self.store.count_notes().await.expect("count notes")
    }

    pub fn anonymous(&self) -> Client {
        Client {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// A client logged in as `user` through the real login form.
    pub async fn login(&self, user: &User) -> Client {
        let mut client = self.anonymous();
        let response = client
            .post(
                routes::LOGIN,
                &[("username", user.username.as_str()), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(response.status, StatusCode::FOUND, "login failed: {}", response.body);
        client.cookie = Some(response.cookie.expect("login sets a session cookie"));
        client
    }
}

pub struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, Body::empty(), None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Body::empty(), None).await
    }

    pub async fn post(&self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        let body = form
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Method::POST,
            uri,
            Body::from(body),
            Some("application/x-www-form-urlencoded"),
        )
        .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Body,
        content_type: Option<&str>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = request.body(body).expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        TestResponse {
            status,
            location,
            cookie,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    #[track_caller]
    pub fn assert_redirects(&self, expected: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(expected));
    }
}
