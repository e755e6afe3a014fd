use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use account_standing_axum::{ACCT_ROUTE_PREFIX, AuthUser};

#[derive(Template)]
#[template(path = "index.j2", escape = "html")]
struct IndexTemplate<'a> {
    username: Option<&'a str>,
    is_staff: bool,
    prefix: &'a str,
}

#[derive(Template)]
#[template(path = "dashboard.j2", escape = "html")]
struct DashboardTemplate<'a> {
    user: &'a AuthUser,
    prefix: &'a str,
}

fn render(template: impl Template) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// Optional user keeps the landing page open to anonymous visitors
pub(crate) async fn index(user: Option<AuthUser>) -> Response {
    render(IndexTemplate {
        username: user.as_ref().map(|u| u.username.as_str()),
        is_staff: user.as_ref().is_some_and(|u| u.is_staff),
        prefix: ACCT_ROUTE_PREFIX.as_str(),
    })
}

// Reached only through the login guard, which stores the user in the extensions
pub(crate) async fn dashboard(user: AuthUser) -> Response {
    render(DashboardTemplate {
        user: &user,
        prefix: ACCT_ROUTE_PREFIX.as_str(),
    })
}
