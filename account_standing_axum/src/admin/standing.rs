use askama::Template;
use axum::{
    Form, Json, Router,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use account_standing::{
    ACCT_ROUTE_PREFIX, AccountStatus, CoordinationError, DisabledAccount, SessionUser,
    list_disabled_accounts, update_account_standing,
};

use crate::config::ACCT_DISPLAY_TIMEZONE;
use crate::error::IntoResponseError;
use crate::middleware::add_csrf_header;
use crate::session::{AuthUser, StaffUser};

pub(crate) fn router() -> Router<()> {
    Router::new()
        .route(
            "/disable_account",
            get(manage_user_standing).post(manage_user_standing_submit),
        )
        .route("/disable_account_ajax", post(disable_account_ajax))
        .route("/manage_user_standing.js", get(serve_manage_user_standing_js))
}

/// Form posted by staff to change a user's standing
#[derive(Debug, Deserialize)]
pub(crate) struct StandingForm {
    username: Option<String>,
    account_action: Option<String>,
    csrf_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MessageResponse {
    pub message: String,
}

/// Outcome of a toggle: status code plus the message shown to staff
type ToggleOutcome = (StatusCode, String);

fn form_csrf_ok(staff: &AuthUser, form: &StandingForm) -> bool {
    if staff.csrf_via_header_verified {
        return true;
    }
    form.csrf_token.as_deref().is_some_and(|token| {
        token
            .as_bytes()
            .ct_eq(staff.csrf_token.as_bytes())
            .into()
    })
}

/// Validate the form and apply the change. Shared by the JSON and HTML endpoints.
async fn apply_standing_change(staff: &AuthUser, form: &StandingForm) -> ToggleOutcome {
    if !form_csrf_ok(staff, form) {
        tracing::warn!("CSRF token missing or mismatched for {}", staff.username);
        return (StatusCode::FORBIDDEN, "CSRF token mismatch".to_string());
    }

    let username = form.username.as_deref().map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return (StatusCode::BAD_REQUEST, "Please enter a username".to_string());
    }

    let Some(action) = form.account_action.as_deref() else {
        return (StatusCode::BAD_REQUEST, "Please choose an option".to_string());
    };

    match update_account_standing(&SessionUser::from(staff), username, action).await {
        Ok(standing) => {
            let verb = match standing.account_status {
                AccountStatus::Disabled => "disabled",
                AccountStatus::Enabled => "reenabled",
            };
            (
                StatusCode::OK,
                format!("Successfully {verb} {username}'s account"),
            )
        }
        Err(CoordinationError::ResourceNotFound { resource_id, .. }) => (
            StatusCode::BAD_REQUEST,
            format!("User with username {resource_id} does not exist"),
        ),
        Err(CoordinationError::InvalidInput(message)) => (StatusCode::BAD_REQUEST, message),
        Err(CoordinationError::Unauthorized) => (StatusCode::NOT_FOUND, String::new()),
        Err(e) => Err::<ToggleOutcome, _>(e)
            .into_response_error()
            .unwrap_or_else(|outcome| outcome),
    }
}

/// `POST /admin/disable_account_ajax`: change a user's standing, answer with JSON
async fn disable_account_ajax(
    StaffUser(staff): StaffUser,
    Form(form): Form<StandingForm>,
) -> Response {
    let (status, message) = apply_standing_change(&staff, &form).await;
    if status == StatusCode::NOT_FOUND {
        return status.into_response();
    }

    let response = (status, Json(MessageResponse { message })).into_response();
    add_csrf_header(response, &staff.csrf_token)
}

#[derive(Debug)]
struct DisabledAccountRow {
    username: String,
    changed_by: String,
    changed_at: String,
}

impl DisabledAccountRow {
    fn from_account(account: DisabledAccount, timezone: &Tz) -> Self {
        Self {
            username: account.username,
            changed_by: account.changed_by,
            changed_at: format_date_tz(&account.standing_last_changed_at, timezone),
        }
    }
}

#[derive(Template)]
#[template(path = "manage_user_standing.j2", escape = "html")]
struct ManageUserStandingTemplate {
    staff_username: String,
    disabled_accounts: Vec<DisabledAccountRow>,
    message: String,
    csrf_token: String,
    acct_route_prefix: String,
}

async fn render_manage_page(
    staff: &AuthUser,
    status: StatusCode,
    message: String,
) -> Result<Response, (StatusCode, String)> {
    let timezone = *ACCT_DISPLAY_TIMEZONE;
    let disabled_accounts = list_disabled_accounts(&SessionUser::from(staff))
        .await
        .into_response_error()?
        .into_iter()
        .map(|account| DisabledAccountRow::from_account(account, &timezone))
        .collect();

    let template = ManageUserStandingTemplate {
        staff_username: staff.username.clone(),
        disabled_accounts,
        message,
        csrf_token: staff.csrf_token.clone(),
        acct_route_prefix: ACCT_ROUTE_PREFIX.to_string(),
    };
    let html = template
        .render()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(add_csrf_header(
        (status, Html(html)).into_response(),
        &staff.csrf_token,
    ))
}

/// `GET /admin/disable_account`: list disabled accounts with the toggle form
async fn manage_user_standing(
    StaffUser(staff): StaffUser,
) -> Result<Response, (StatusCode, String)> {
    render_manage_page(&staff, StatusCode::OK, String::new()).await
}

/// `POST /admin/disable_account`: plain form submission, re-renders the page
async fn manage_user_standing_submit(
    StaffUser(staff): StaffUser,
    Form(form): Form<StandingForm>,
) -> Result<Response, (StatusCode, String)> {
    let (status, message) = apply_standing_change(&staff, &form).await;
    if status == StatusCode::NOT_FOUND {
        return Ok(status.into_response());
    }
    render_manage_page(&staff, status, message).await
}

async fn serve_manage_user_standing_js(
    StaffUser(_): StaffUser,
) -> Result<Response, (StatusCode, String)> {
    let js_content = include_str!("../../static/manage_user_standing.js");
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/javascript")
        .body(js_content.to_string().into())
        .into_response_error()
}

/// Format as `YYYY-MM-DD HH:MM TZ` in the display timezone
fn format_date_tz(date: &DateTime<Utc>, timezone: &Tz) -> String {
    let local_time = date.with_timezone(timezone);
    format!("{}", local_time.format("%Y-%m-%d %H:%M %Z"))
}
