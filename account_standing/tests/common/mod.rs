use std::sync::Once;

use account_standing::{SessionUser, User, create_user_account, get_user_from_headers};
use http::{HeaderMap, HeaderValue, header::COOKIE, header::SET_COOKIE};

pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
    account_standing::init()
        .await
        .expect("Failed to initialize stores");
}

pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

pub async fn create_account(prefix: &str, is_staff: bool) -> User {
    create_user_account(&unique_name(prefix), TEST_PASSWORD, is_staff)
        .await
        .expect("Failed to create account")
}

/// Turn the `Set-Cookie` headers of a login into request headers carrying the cookie
pub fn request_headers_from(login_headers: &HeaderMap) -> HeaderMap {
    let cookie = login_headers
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("Login should set a session cookie")
        .to_string();

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&cookie).expect("Cookie should be a valid header value"),
    );
    headers
}

pub async fn session_user_for(login_headers: &HeaderMap) -> SessionUser {
    get_user_from_headers(&request_headers_from(login_headers))
        .await
        .expect("Session lookup failed")
        .expect("Session should resolve to a user")
}
