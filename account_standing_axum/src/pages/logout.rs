use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{TypedHeader, headers};

use account_standing::prepare_logout_response;

use crate::config::ACCT_REDIRECT_ANON;

/// Drop the session and expire the cookie, then go to the anonymous landing page
pub(super) async fn logout(cookies: Option<TypedHeader<headers::Cookie>>) -> Response {
    let Some(TypedHeader(cookies)) = cookies else {
        return Redirect::to(ACCT_REDIRECT_ANON.as_str()).into_response();
    };

    match prepare_logout_response(cookies).await {
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        Ok(headers) => {
            tracing::debug!("Logged out, redirecting to {}", ACCT_REDIRECT_ANON.as_str());
            (headers, Redirect::to(ACCT_REDIRECT_ANON.as_str())).into_response()
        }
    }
}
