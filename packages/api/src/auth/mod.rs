//! Authentication: password hashing, session identity and the login gate.

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{log_in, log_out, session_user, CurrentUser, Viewer, SESSION_USER_ID_KEY};
