//! 会话认证。

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{
    CurrentUser, MaybeUser, SESSION_COOKIE, SessionUser, clear_session_cookie, session_cookie,
    session_token,
};
