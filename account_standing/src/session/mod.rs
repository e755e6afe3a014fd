mod config;
mod errors;
mod main;
mod types;

pub use config::SESSION_COOKIE_NAME;
pub use errors::SessionError;
pub use main::{
    get_user_and_csrf_token_from_session, get_user_from_headers,
    is_authenticated_basic_then_user_and_csrf, prepare_logout_response,
};
pub use types::{CsrfHeaderVerified, CsrfToken, User};

pub(crate) use main::create_new_session_with_uid;
