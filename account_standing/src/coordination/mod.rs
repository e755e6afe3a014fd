//! Account coordination
//!
//! High-level operations that combine the user database, account standing
//! records and sessions. Handlers in the web layer call these.

mod admin;
mod auth;
mod errors;

pub use admin::{
    DisabledAccount, get_account_status, get_user_standing, list_disabled_accounts,
    update_account_standing,
};
pub use auth::{create_user_account, get_user_by_username, login_with_password};
pub use errors::CoordinationError;
