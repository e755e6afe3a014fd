use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use http::{Method, StatusCode, request::Parts};

use super::config::ACCT_LOGIN_URL;
use account_standing::{SessionError, SessionUser, is_authenticated_basic_then_user_and_csrf};

pub struct AuthRedirect {
    method: Method,
    /// Path to come back to after logging in
    next: String,
}

impl AuthRedirect {
    fn new(method: Method, next: &str) -> Self {
        Self {
            method,
            next: next.to_string(),
        }
    }

    fn into_response_with_method(self) -> Response {
        if self.method == Method::GET {
            let location = format!(
                "{}?next={}",
                ACCT_LOGIN_URL.as_str(),
                urlencoding::encode(&self.next)
            );
            tracing::debug!("Redirecting to {}", location);
            Redirect::temporary(&location).into_response()
        } else {
            tracing::debug!("Unauthorized");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        self.into_response_with_method()
    }
}

/// Authenticated user, available as an Axum extractor
///
/// Resolves the session cookie to a user. For state-changing methods
/// (POST, PUT, DELETE, PATCH) a present `X-CSRF-Token` header must match the
/// session token. Without the header only form posts are let through, with
/// `csrf_via_header_verified` left `false` so the handler can check the form's
/// `csrf_token` field.
///
/// # Example
///
/// ```no_run
/// use account_standing_axum::AuthUser;
/// use axum::{Router, routing::get};
///
/// async fn dashboard(user: AuthUser) -> String {
///     format!("Signed in as {}", user.username)
/// }
///
/// let app: Router = Router::new().route("/dashboard", get(dashboard));
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    /// Staff accounts may change other users' standing
    pub is_staff: bool,
    pub sequence_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// CSRF token associated with the user's session
    pub csrf_token: String,
    /// Whether the CSRF token was verified via the `X-CSRF-Token` header
    pub csrf_via_header_verified: bool,
}

impl From<&AuthUser> for SessionUser {
    fn from(auth_user: &AuthUser) -> Self {
        SessionUser {
            id: auth_user.id.clone(),
            username: auth_user.username.clone(),
            is_staff: auth_user.is_staff,
            sequence_number: auth_user.sequence_number,
            created_at: auth_user.created_at,
            updated_at: auth_user.updated_at,
        }
    }
}

impl From<SessionUser> for AuthUser {
    fn from(session_user: SessionUser) -> Self {
        AuthUser {
            id: session_user.id,
            username: session_user.username,
            is_staff: session_user.is_staff,
            sequence_number: session_user.sequence_number,
            created_at: session_user.created_at,
            updated_at: session_user.updated_at,
            csrf_token: String::new(),
            csrf_via_header_verified: false,
        }
    }
}

async fn auth_user_from_parts(parts: &Parts) -> Result<AuthUser, SessionError> {
    let (session_user, csrf_token, verified) =
        is_authenticated_basic_then_user_and_csrf(&parts.headers, &parts.method).await?;

    let mut auth_user = AuthUser::from(session_user);
    auth_user.csrf_token = csrf_token.as_str().to_string();
    auth_user.csrf_via_header_verified = verified.0;
    Ok(auth_user)
}

impl<B> FromRequestParts<B> for AuthUser
where
    B: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _: &B) -> Result<Self, Self::Rejection> {
        // The login guard may already have resolved the user
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        auth_user_from_parts(parts).await.map_err(|e| {
            tracing::debug!("No authenticated user: {}", e);
            AuthRedirect::new(parts.method.clone(), parts.uri.path())
        })
    }
}

impl<B> OptionalFromRequestParts<B> for AuthUser
where
    B: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &B,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthUser as FromRequestParts<B>>::from_request_parts(parts, state).await;
        Ok(result.ok())
    }
}

/// Rejection for staff-only routes. Always a bare 404 so the route stays hidden.
pub struct StaffOnly;

impl IntoResponse for StaffOnly {
    fn into_response(self) -> Response {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Authenticated staff user.
///
/// Anonymous callers, non-staff users and bad CSRF headers all get 404.
#[derive(Clone, Debug)]
pub struct StaffUser(pub AuthUser);

impl<B> FromRequestParts<B> for StaffUser
where
    B: Send + Sync,
{
    type Rejection = StaffOnly;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        let auth_user = <AuthUser as FromRequestParts<B>>::from_request_parts(parts, state)
            .await
            .map_err(|_| StaffOnly)?;

        if !auth_user.is_staff {
            tracing::warn!(
                "User {} tried to reach staff route {}",
                auth_user.username,
                parts.uri.path()
            );
            return Err(StaffOnly);
        }

        Ok(StaffUser(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session_user(is_staff: bool) -> SessionUser {
        let now = Utc::now();
        SessionUser {
            id: "user123".to_string(),
            username: "good_user".to_string(),
            is_staff,
            sequence_number: 42,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_from_session_user_to_auth_user() {
        let session_user = sample_session_user(true);
        let created_at = session_user.created_at;

        let auth_user = AuthUser::from(session_user);

        assert_eq!(auth_user.id, "user123");
        assert_eq!(auth_user.username, "good_user");
        assert!(auth_user.is_staff);
        assert_eq!(auth_user.sequence_number, 42);
        assert_eq!(auth_user.created_at, created_at);
        assert_eq!(auth_user.csrf_token, "");
        assert!(!auth_user.csrf_via_header_verified);
    }

    #[test]
    fn test_from_auth_user_to_session_user() {
        let mut auth_user = AuthUser::from(sample_session_user(false));
        auth_user.csrf_token = "csrf-token-value".to_string();
        auth_user.csrf_via_header_verified = true;

        let session_user = SessionUser::from(&auth_user);

        assert_eq!(session_user.id, "user123");
        assert_eq!(session_user.username, "good_user");
        assert!(!session_user.is_staff);
        assert_eq!(session_user.sequence_number, 42);
    }

    #[test]
    fn test_auth_redirect_into_response_with_method() {
        let response = AuthRedirect::new(Method::GET, "/dashboard/settings").into_response_with_method();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            format!("{}?next=%2Fdashboard%2Fsettings", ACCT_LOGIN_URL.as_str()).as_str()
        );

        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let response = AuthRedirect::new(method, "/dashboard").into_response_with_method();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_staff_only_is_not_found() {
        assert_eq!(StaffOnly.into_response().status(), StatusCode::NOT_FOUND);
    }
}
