use askama::Template;
use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use account_standing::{ACCT_ROUTE_PREFIX, CoordinationError, login_with_password};

use crate::config::ACCT_REDIRECT_USER;
use crate::error::IntoResponseError;
use crate::middleware::{add_csrf_header, disabled_account_message};
use crate::session::AuthUser;

#[derive(Template)]
#[template(path = "login.j2", escape = "html")]
struct LoginTemplate<'a> {
    message: &'a str,
    next: &'a str,
    acct_route_prefix: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginForm {
    username: String,
    password: String,
    next: Option<String>,
}

/// Only same-site paths are followed after login.
///
/// Browsers read `/\host` like `//host`, so backslashes are refused along with
/// control characters, which cannot go into a `Location` header.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => ACCT_REDIRECT_USER.as_str(),
    }
}

fn render_login(status: StatusCode, message: &str, next: &str) -> Result<Response, (StatusCode, String)> {
    let template = LoginTemplate {
        message,
        next,
        acct_route_prefix: ACCT_ROUTE_PREFIX.as_str(),
    };
    let html = template
        .render()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((status, Html(html)).into_response())
}

pub(super) async fn login_page(
    user: Option<AuthUser>,
    Query(query): Query<NextQuery>,
) -> Result<Response, (StatusCode, String)> {
    let next = safe_next(query.next.as_deref());
    match user {
        Some(_) => Ok(Redirect::to(next).into_response()),
        None => render_login(StatusCode::OK, "", next),
    }
}

pub(super) async fn login_submit(Form(form): Form<LoginForm>) -> Result<Response, (StatusCode, String)> {
    let next = safe_next(form.next.as_deref());

    match login_with_password(&form.username, &form.password).await {
        Ok((headers, csrf_token)) => {
            tracing::debug!("Login succeeded, redirecting to {}", next);
            let response = (headers, Redirect::to(next)).into_response();
            Ok(add_csrf_header(response, csrf_token.as_str()))
        }
        Err(CoordinationError::Authentication(_)) => render_login(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password",
            next,
        ),
        Err(CoordinationError::AccountDisabled(_)) => {
            Ok((StatusCode::FORBIDDEN, disabled_account_message()).into_response())
        }
        Err(e) => Err::<Response, _>(e).into_response_error(),
    }
}
