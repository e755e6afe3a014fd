use http::HeaderMap;

use crate::session::{CsrfToken, create_new_session_with_uid};
use crate::standing::{AccountStatus, StandingStore};
use crate::userdb::{User, UserSearchField, UserStore, hash_password, verify_password};

use super::errors::CoordinationError;

/// Create a login account.
///
/// The username is trimmed. Fails with `Conflict` if it is already taken.
pub async fn create_user_account(
    username: &str,
    password: &str,
    is_staff: bool,
) -> Result<User, CoordinationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CoordinationError::InvalidInput("Username must not be empty".to_string()).log());
    }

    if UserStore::get_user_by(UserSearchField::Username(username.to_string()))
        .await?
        .is_some()
    {
        return Err(CoordinationError::Conflict(format!("Username {username} is already taken")).log());
    }

    let mut user = User::new(username.to_string(), hash_password(password)?);
    user.is_staff = is_staff;

    let user = UserStore::upsert_user(user).await?;
    tracing::info!(user_id = %user.id, is_staff, "Created account {}", user.username);
    Ok(user)
}

/// Check a username and password and open a session.
///
/// Returns the `Set-Cookie` headers for the new session and its CSRF token.
/// Disabled accounts are refused before a session is created.
pub async fn login_with_password(
    username: &str,
    password: &str,
) -> Result<(HeaderMap, CsrfToken), CoordinationError> {
    let user = UserStore::get_user_by(UserSearchField::Username(username.trim().to_string()))
        .await?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or_else(|| {
            CoordinationError::Authentication("Invalid username or password".to_string()).log()
        })?;

    if StandingStore::effective_status(&user.id).await? == AccountStatus::Disabled {
        return Err(CoordinationError::AccountDisabled(user.username).log());
    }

    let (headers, csrf_token) = create_new_session_with_uid(&user.id).await?;
    tracing::info!(user_id = %user.id, "User {} logged in", user.username);
    Ok((headers, csrf_token))
}

pub async fn get_user_by_username(username: &str) -> Result<Option<User>, CoordinationError> {
    Ok(UserStore::get_user_by(UserSearchField::Username(username.to_string())).await?)
}
