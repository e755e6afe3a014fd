//! Shared harness: a small application wired the way a host app would use the crate
#![allow(dead_code)]

use std::sync::Once;
use std::sync::atomic::{AtomicU64, Ordering};

use account_standing::{User, create_user_account};
use account_standing_axum::{
    ACCT_ROUTE_PREFIX, AuthUser, account_standing_router_no_trace, is_authenticated_user_redirect,
    require_good_standing,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
    middleware::from_fn,
    response::Response,
    routing::get,
};
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
        if let Some(path) = std::env::var("GENERIC_DATA_STORE_URL")
            .ok()
            .and_then(|url| url.strip_prefix("sqlite:").map(str::to_string))
            .filter(|path| !path.contains(":memory:"))
        {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{path}{suffix}"));
            }
        }
    });
    account_standing::init()
        .await
        .expect("Failed to initialize stores");
}

async fn dashboard(user: AuthUser) -> String {
    format!("Welcome, {}", user.username)
}

/// Protected dashboard behind the login guard, account routes under the prefix,
/// and the standing gate over everything
pub fn app() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route_layer(from_fn(is_authenticated_user_redirect))
        .nest(ACCT_ROUTE_PREFIX.as_str(), account_standing_router_no_trace())
        .layer(from_fn(require_good_standing))
}

pub fn acct_path(path: &str) -> String {
    format!("{}{}", ACCT_ROUTE_PREFIX.as_str(), path)
}

pub fn unique_name(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{prefix}-{nanos:x}-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

pub async fn create_account(prefix: &str, is_staff: bool) -> User {
    create_user_account(&unique_name(prefix), TEST_PASSWORD, is_staff)
        .await
        .expect("Failed to create account")
}

/// A logged-in browser: the session cookie plus the CSRF token the server echoed
pub struct Client {
    pub cookie: String,
    pub csrf_token: String,
}

pub async fn send(request: Request<Body>) -> Response {
    app().oneshot(request).await.expect("Router is infallible")
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_message(response: Response) -> String {
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("Body is not JSON");
    json["message"]
        .as_str()
        .expect("JSON body has no message")
        .to_string()
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn post_login(username: &str, password: &str) -> Response {
    send(
        Request::post(acct_path("/login"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(&[
                ("username", username),
                ("password", password),
            ])))
            .unwrap(),
    )
    .await
}

pub async fn login(user: &User) -> Client {
    let response = post_login(&user.username, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");
    client_from_headers(response.headers())
}

fn client_from_headers(headers: &HeaderMap) -> Client {
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("Login should set a session cookie")
        .to_string();
    let csrf_token = headers
        .get("X-CSRF-Token")
        .and_then(|v| v.to_str().ok())
        .expect("Login should echo the CSRF token")
        .to_string();
    Client { cookie, csrf_token }
}

impl Client {
    pub async fn get(&self, path: &str) -> Response {
        send(
            Request::get(path)
                .header(header::COOKIE, &self.cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Form post carrying the CSRF token in the `X-CSRF-Token` header
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        send(
            Request::post(path)
                .header(header::COOKIE, &self.cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("X-CSRF-Token", &self.csrf_token)
                .body(Body::from(form_body(fields)))
                .unwrap(),
        )
        .await
    }

    /// Form post carrying the CSRF token only as the `csrf_token` field
    pub async fn post_plain_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        let mut fields = fields.to_vec();
        fields.push(("csrf_token", self.csrf_token.as_str()));
        send(
            Request::post(path)
                .header(header::COOKIE, &self.cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body(&fields)))
                .unwrap(),
        )
        .await
    }
}
