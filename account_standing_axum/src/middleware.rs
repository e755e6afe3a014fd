use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use http::header::HeaderValue;

use super::config::{ACCT_LOGIN_URL, ACCT_RESPOND_WITH_X_CSRF_TOKEN, ACCT_SUPPORT_EMAIL};
use super::session::AuthUser;
use account_standing::{AccountStatus, SessionError, get_account_status, get_user_from_headers};

/// Add the session's CSRF token to a response as `X-CSRF-Token`
pub(crate) fn add_csrf_header(mut response: Response, csrf_token: &str) -> Response {
    if !*ACCT_RESPOND_WITH_X_CSRF_TOKEN {
        return response;
    }

    if let Ok(header_value) = HeaderValue::from_str(csrf_token) {
        response.headers_mut().insert("X-CSRF-Token", header_value);
    } else {
        tracing::error!("Failed to create CSRF header value from token");
    }
    response
}

pub(crate) fn disabled_account_message() -> String {
    format!(
        "Your account has been disabled. If you believe this was done in error, please contact us at {}",
        ACCT_SUPPORT_EMAIL.as_str()
    )
}

fn handle_auth_error(err: SessionError, req: &Request) -> Response {
    match err {
        SessionError::CsrfToken(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
        _ if req.method() == http::Method::GET => {
            let location = format!(
                "{}?next={}",
                ACCT_LOGIN_URL.as_str(),
                urlencoding::encode(req.uri().path())
            );
            Redirect::temporary(&location).into_response()
        }
        _ => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

/// Refuse every request from a session whose account is disabled.
///
/// Requests without a session pass through untouched.
pub async fn require_good_standing(req: Request, next: Next) -> Response {
    let user = match get_user_from_headers(req.headers()).await {
        Ok(Some(user)) => user,
        Ok(None) => return next.run(req).await,
        Err(e) => {
            tracing::error!("Failed to resolve session: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match get_account_status(&user.id).await {
        Ok(AccountStatus::Enabled) => next.run(req).await,
        Ok(AccountStatus::Disabled) => {
            tracing::warn!(
                "Blocked request to {} from disabled account {}",
                req.uri().path(),
                user.username
            );
            (StatusCode::FORBIDDEN, disabled_account_message()).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Login-required guard.
///
/// Puts the `AuthUser` into request extensions and echoes the CSRF token.
/// Anonymous `GET` requests are redirected to the login page.
pub async fn is_authenticated_user_redirect(mut req: Request, next: Next) -> Response {
    match account_standing::is_authenticated_basic_then_user_and_csrf(req.headers(), req.method())
        .await
    {
        Ok((user, csrf_token, csrf_via_header_verified)) => {
            let mut auth_user = AuthUser::from(user);
            auth_user.csrf_token = csrf_token.as_str().to_string();
            auth_user.csrf_via_header_verified = csrf_via_header_verified.0;
            tracing::debug!(
                "User: {}, CSRF via header: {}",
                auth_user.username,
                auth_user.csrf_via_header_verified
            );
            req.extensions_mut().insert(auth_user);
            let response = next.run(req).await;
            add_csrf_header(response, csrf_token.as_str())
        }
        Err(err) => handle_auth_error(err, &req),
    }
}
