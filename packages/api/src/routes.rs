//! # Named routes
//!
//! Every page has a name (`"notes:edit"`, `"users:login"`, ...) and a path.
//! Handlers, templates and tests build URLs through [`reverse`] or the helpers
//! below rather than spelling paths out.
//!
//! | Name | Path |
//! |------|------|
//! | `notes:home` (or `home`) | `/` |
//! | `notes:list` | `/notes/` |
//! | `notes:add` | `/add/` |
//! | `notes:success` | `/done/` |
//! | `notes:detail` | `/note/{slug}/` |
//! | `notes:edit` | `/edit/{slug}/` |
//! | `notes:delete` | `/delete/{slug}/` |
//! | `users:login` | `/auth/login/` |
//! | `users:logout` | `/auth/logout/` |
//! | `users:signup` | `/auth/signup/` |

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub const HOME: &str = "/";
pub const NOTES_LIST: &str = "/notes/";
pub const NOTES_ADD: &str = "/add/";
pub const NOTES_SUCCESS: &str = "/done/";
pub const NOTES_DETAIL: &str = "/note/{slug}/";
pub const NOTES_EDIT: &str = "/edit/{slug}/";
pub const NOTES_DELETE: &str = "/delete/{slug}/";
pub const LOGIN: &str = "/auth/login/";
pub const LOGOUT: &str = "/auth/logout/";
pub const SIGNUP: &str = "/auth/signup/";

pub fn note_detail(slug: &str) -> String {
    NOTES_DETAIL.replace("{slug}", slug)
}

pub fn note_edit(slug: &str) -> String {
    NOTES_EDIT.replace("{slug}", slug)
}

pub fn note_delete(slug: &str) -> String {
    NOTES_DELETE.replace("{slug}", slug)
}

/// Resolve a route name to its path. Note pages need a slug, the rest must not get one.
pub fn reverse(name: &str, slug: Option<&str>) -> Option<String> {
    let path = match (name, slug) {
        ("home" | "notes:home", None) => HOME.to_string(),
        ("notes:list", None) => NOTES_LIST.to_string(),
        ("notes:add", None) => NOTES_ADD.to_string(),
        ("notes:success", None) => NOTES_SUCCESS.to_string(),
        ("notes:detail", Some(slug)) => note_detail(slug),
        ("notes:edit", Some(slug)) => note_edit(slug),
        ("notes:delete", Some(slug)) => note_delete(slug),
        ("users:login", None) => LOGIN.to_string(),
        ("users:logout", None) => LOGOUT.to_string(),
        ("users:signup", None) => SIGNUP.to_string(),
        _ => return None,
    };
    Some(path)
}

/// The login URL that sends the user back to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!("{LOGIN}?next={}", urlencoding::encode(next).replace("%2F", "/"))
}

/// `next` if it points back into this site, so login cannot redirect elsewhere.
pub fn safe_next(next: &str) -> Option<&str> {
    let local = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    local.then_some(next)
}

/// A plain `302 Found` redirect.
pub fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_named_routes() {
        assert_eq!(reverse("home", None).as_deref(), Some("/"));
        assert_eq!(reverse("notes:list", None).as_deref(), Some("/notes/"));
        assert_eq!(
            reverse("notes:edit", Some("test_slug")).as_deref(),
            Some("/edit/test_slug/")
        );
        assert_eq!(
            reverse("notes:delete", Some("test_slug")).as_deref(),
            Some("/delete/test_slug/")
        );
        assert_eq!(reverse("notes:detail", None), None);
        assert_eq!(reverse("notes:list", Some("x")), None);
        assert_eq!(reverse("nope", None), None);
    }

    #[test]
    fn test_login_url_keeps_slashes() {
        assert_eq!(login_url("/notes/"), "/auth/login/?next=/notes/");
        assert_eq!(
            login_url("/edit/a-b_c/"),
            "/auth/login/?next=/edit/a-b_c/"
        );
        assert_eq!(
            login_url("/notes/?page=2"),
            "/auth/login/?next=/notes/%3Fpage%3D2"
        );
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next("/notes/"), Some("/notes/"));
        assert_eq!(safe_next("//evil.example"), None);
        assert_eq!(safe_next("https://evil.example"), None);
        assert_eq!(safe_next(""), None);
    }

    #[test]
    fn test_found_redirect() {
        let response = found(NOTES_SUCCESS);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/done/");
    }
}
