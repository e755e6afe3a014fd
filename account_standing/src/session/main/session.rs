use chrono::{Duration, Utc};
use http::Method;
use http::header::{CONTENT_TYPE, COOKIE, HeaderMap};
use subtle::ConstantTimeEq;

use crate::session::config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::session::types::{CsrfHeaderVerified, CsrfToken, StoredSession, User as SessionUser};
use crate::storage::GENERIC_CACHE_STORE;
use crate::userdb::UserStore;
use crate::utils::{gen_random_string, header_set_cookie};

const SESSION_PREFIX: &str = "session";

/// Prepare a logout response by expiring the session cookie and deleting the session from storage
pub async fn prepare_logout_response(cookies: headers::Cookie) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, SESSION_COOKIE_NAME.as_str(), "value", -86400)?;

    if let Some(session_id) = cookies.get(SESSION_COOKIE_NAME.as_str()) {
        delete_session_from_store_by_session_id(session_id).await?;
    }
    Ok(headers)
}

/// Start a session for `user_id`, returning the `Set-Cookie` header and the session's CSRF token
pub(crate) async fn create_new_session_with_uid(
    user_id: &str,
) -> Result<(HeaderMap, CsrfToken), SessionError> {
    let session_id = gen_random_string(32)?;
    let csrf_token = gen_random_string(32)?;
    let expires_at = Utc::now() + Duration::seconds(*SESSION_COOKIE_MAX_AGE as i64);

    let stored_session = StoredSession {
        user_id: user_id.to_string(),
        csrf_token: csrf_token.clone(),
        expires_at,
        ttl: *SESSION_COOKIE_MAX_AGE,
    };

    GENERIC_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(
            SESSION_PREFIX,
            &session_id,
            stored_session.try_into()?,
            *SESSION_COOKIE_MAX_AGE as usize,
        )
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        SESSION_COOKIE_NAME.as_str(),
        &session_id,
        *SESSION_COOKIE_MAX_AGE as i64,
    )?;

    tracing::debug!(user_id, "Created new session");
    Ok((headers, CsrfToken::new(csrf_token)))
}

pub(crate) async fn delete_session_from_store_by_session_id(
    session_id: &str,
) -> Result<(), SessionError> {
    GENERIC_CACHE_STORE
        .lock()
        .await
        .remove(SESSION_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))
}

async fn load_stored_session(session_id: &str) -> Result<Option<StoredSession>, SessionError> {
    let Some(cached_session) = GENERIC_CACHE_STORE
        .lock()
        .await
        .get(SESSION_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?
    else {
        return Ok(None);
    };

    let stored_session: StoredSession = cached_session.try_into()?;

    if stored_session.expires_at < Utc::now() {
        tracing::debug!("Session expired at {}", stored_session.expires_at);
        delete_session_from_store_by_session_id(session_id).await?;
        return Ok(None);
    }

    Ok(Some(stored_session))
}

async fn load_session_user(stored_session: &StoredSession) -> Result<SessionUser, SessionError> {
    let user = UserStore::get_user(&stored_session.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Error checking user existence: {}", e);
            SessionError::from(e)
        })?
        .ok_or(SessionError::SessionError)?;

    Ok(SessionUser::from(user))
}

/// Resolve a session id (the cookie value) to its user and CSRF token
pub async fn get_user_and_csrf_token_from_session(
    session_id: &str,
) -> Result<(SessionUser, CsrfToken), SessionError> {
    let stored_session = load_stored_session(session_id)
        .await?
        .ok_or(SessionError::SessionError)?;

    let user = load_session_user(&stored_session).await?;

    Ok((user, CsrfToken::new(stored_session.csrf_token)))
}

pub(crate) fn get_session_id_from_headers(
    headers: &HeaderMap,
) -> Result<Option<&str>, SessionError> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        tracing::trace!("No cookie header found");
        return Ok(None);
    };

    // Cookies set by other apps on the domain may not be UTF-8. No session then.
    let Ok(cookie_str) = cookie_header.to_str() else {
        tracing::debug!("Cookie header is not valid UTF-8, treating as no session");
        return Ok(None);
    };

    let cookie_name = SESSION_COOKIE_NAME.as_str();

    let session_id = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    });

    if session_id.is_none() {
        tracing::trace!("No session cookie '{}' found in cookies", cookie_name);
    }

    Ok(session_id)
}

/// User behind the request's session cookie, without any CSRF check.
///
/// Returns `None` when there is no cookie or the session is unknown or expired.
pub async fn get_user_from_headers(
    headers: &HeaderMap,
) -> Result<Option<SessionUser>, SessionError> {
    let Some(session_id) = get_session_id_from_headers(headers)? else {
        return Ok(None);
    };

    let Some(stored_session) = load_stored_session(session_id).await? else {
        return Ok(None);
    };

    match load_session_user(&stored_session).await {
        Ok(user) => Ok(Some(user)),
        Err(SessionError::SessionError) => Ok(None),
        Err(e) => Err(e),
    }
}

fn is_state_changing(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::DELETE
        || method == Method::PATCH
}

fn is_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| {
            ct.starts_with("application/x-www-form-urlencoded")
                || ct.starts_with("multipart/form-data")
        })
}

/// Check the `X-CSRF-Token` header against the session's token.
///
/// Safe methods always pass. State-changing requests without the header pass only
/// for form content types, reported as `CsrfHeaderVerified(false)`.
pub(crate) fn verify_csrf_header(
    headers: &HeaderMap,
    method: &Method,
    csrf_token: &CsrfToken,
) -> Result<CsrfHeaderVerified, SessionError> {
    if !is_state_changing(method) {
        return Ok(CsrfHeaderVerified(false));
    }

    match headers.get("X-CSRF-Token").and_then(|h| h.to_str().ok()) {
        Some(header_token) => {
            if header_token
                .as_bytes()
                .ct_eq(csrf_token.as_str().as_bytes())
                .into()
            {
                tracing::trace!("CSRF token via X-CSRF-Token header verified");
                Ok(CsrfHeaderVerified(true))
            } else {
                tracing::debug!("CSRF token mismatch");
                Err(SessionError::CsrfToken("CSRF token mismatch".to_string()))
            }
        }
        None if is_form_content_type(headers) => {
            tracing::trace!("No X-CSRF-Token header on form post; handler must check form token");
            Ok(CsrfHeaderVerified(false))
        }
        None => {
            tracing::warn!("X-CSRF-Token header missing for non-form state-changing request");
            Err(SessionError::CsrfToken("No CSRF token found".to_string()))
        }
    }
}

/// Authenticate from request headers and return the user, the session's CSRF token
/// and whether the token was verified from the header.
pub async fn is_authenticated_basic_then_user_and_csrf(
    headers: &HeaderMap,
    method: &Method,
) -> Result<(SessionUser, CsrfToken, CsrfHeaderVerified), SessionError> {
    let session_id = get_session_id_from_headers(headers)?.ok_or(SessionError::SessionError)?;

    let stored_session = load_stored_session(session_id)
        .await?
        .ok_or(SessionError::SessionError)?;

    let csrf_token = CsrfToken::new(stored_session.csrf_token.clone());
    let verified = verify_csrf_header(headers, method, &csrf_token)?;

    let user = load_session_user(&stored_session).await?;

    Ok((user, csrf_token, verified))
}
