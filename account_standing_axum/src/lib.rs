//! Axum integration for account-standing
//!
//! Provides the login and staff moderation routes, the `AuthUser` and
//! `StaffUser` extractors and the `require_good_standing` middleware that
//! turns disabled accounts away.

mod admin;
mod config;
mod error;
mod middleware;
mod pages;
mod router;
mod session;

pub use config::{ACCT_LOGIN_URL, ACCT_REDIRECT_ANON, ACCT_REDIRECT_USER};
pub use middleware::{is_authenticated_user_redirect, require_good_standing};
pub use router::{account_standing_router, account_standing_router_no_trace};
pub use session::{AuthUser, StaffUser};

// Re-export the route prefix and initialization function from account_standing crate
pub use account_standing::{ACCT_ROUTE_PREFIX, CoordinationError, create_user_account, init};
