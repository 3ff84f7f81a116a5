//! Which pages answer whom: public pages, owner-only note pages, and the login
//! redirect for anonymous visitors.

mod common;

use api::routes;
use axum::http::StatusCode;
use common::TestApp;
use store::{Note, User};

struct Fixture {
    app: TestApp,
    author: User,
    reader: User,
    note: Note,
}

async fn fixture() -> Fixture {
    let app = TestApp::new().await;
    let author = app.create_user("IceFrog").await;
    let reader = app.create_user("IamGroot").await;
    let note = app.create_note(&author, "title", "text", None).await;
    Fixture {
        app,
        author,
        reader,
        note,
    }
}

#[tokio::test]
async fn test_public_pages_availability() {
    let fx = fixture().await;
    let anonymous = fx.app.anonymous();
    for name in ["notes:home", "users:login", "users:logout", "users:signup"] {
        let url = routes::reverse(name, None).unwrap();
        let response = anonymous.get(&url).await;
        assert_eq!(response.status, StatusCode::OK, "{name}");
    }
}

#[tokio::test]
async fn test_logged_in_pages_availability() {
    let fx = fixture().await;
    let client = fx.app.login(&fx.author).await;
    for name in ["notes:list", "notes:add", "notes:success"] {
        let url = routes::reverse(name, None).unwrap();
        let response = client.get(&url).await;
        assert_eq!(response.status, StatusCode::OK, "{name}");
    }
}

#[tokio::test]
async fn test_availability_for_detail_edit_and_delete() {
    let fx = fixture().await;
    let users_statuses = [
        (&fx.author, StatusCode::OK),
        (&fx.reader, StatusCode::NOT_FOUND),
    ];
    for (user, status) in users_statuses {
        let client = fx.app.login(user).await;
        for name in ["notes:detail", "notes:edit", "notes:delete"] {
            let url = routes::reverse(name, Some(&fx.note.slug)).unwrap();
            let response = client.get(&url).await;
            assert_eq!(response.status, status, "{} on {name}", user.username);
        }
    }
}

#[tokio::test]
async fn test_missing_note_is_not_found() {
    let fx = fixture().await;
    let client = fx.app.login(&fx.author).await;
    for url in [
        routes::note_detail("missing"),
        routes::note_edit("missing"),
        routes::note_delete("missing"),
    ] {
        assert_eq!(client.get(&url).await.status, StatusCode::NOT_FOUND, "{url}");
    }
}

#[tokio::test]
async fn test_redirect_for_anonymous_client() {
    let fx = fixture().await;
    let anonymous = fx.app.anonymous();
    let login_url = routes::reverse("users:login", None).unwrap();
    for (name, slug) in [
        ("notes:list", None),
        ("notes:add", None),
        ("notes:success", None),
        ("notes:detail", Some(fx.note.slug.as_str())),
        ("notes:edit", Some(fx.note.slug.as_str())),
        ("notes:delete", Some(fx.note.slug.as_str())),
    ] {
        let url = routes::reverse(name, slug).unwrap();
        let response = anonymous.get(&url).await;
        response.assert_redirects(&format!("{login_url}?next={url}"));
    }
}

#[tokio::test]
async fn test_logout_ends_session() {
    let fx = fixture().await;
    let client = fx.app.login(&fx.author).await;
    assert_eq!(client.get(routes::NOTES_LIST).await.status, StatusCode::OK);

    let response = client.post(routes::LOGOUT, &[]).await;
    assert_eq!(response.status, StatusCode::OK);

    client
        .get(routes::NOTES_LIST)
        .await
        .assert_redirects(&routes::login_url(routes::NOTES_LIST));
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let fx = fixture().await;
    let response = fx.app.anonymous().get("/no/such/page/").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
