mod session;

pub use session::{
    get_user_and_csrf_token_from_session, get_user_from_headers,
    is_authenticated_basic_then_user_and_csrf, prepare_logout_response,
};

pub(crate) use session::create_new_session_with_uid;
