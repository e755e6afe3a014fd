//! account_standing - account moderation core
//!
//! Users, password login sessions and the per-user standing record that staff
//! use to disable and re-enable accounts. Storage is pluggable between SQLite
//! and PostgreSQL for data and in-memory or Redis for sessions.

mod config;
mod coordination;
mod session;
mod standing;
mod storage;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

pub use coordination::{
    CoordinationError, DisabledAccount, create_user_account, get_account_status,
    get_user_by_username, get_user_standing, list_disabled_accounts, login_with_password,
    update_account_standing,
};

pub use config::ACCT_ROUTE_PREFIX;

pub use session::{
    CsrfHeaderVerified, CsrfToken, SESSION_COOKIE_NAME, SessionError, User as SessionUser,
    get_user_and_csrf_token_from_session, get_user_from_headers,
    is_authenticated_basic_then_user_and_csrf, prepare_logout_response,
};

pub use standing::{AccountAction, AccountStatus, StandingError, UserStanding};
pub use storage::StorageError;
pub use userdb::{User, UserError};

/// Initialize storage backends and create tables
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    userdb::init().await?;
    standing::init().await?;
    Ok(())
}
