//! Central configuration for the account_standing crate

use std::sync::LazyLock;

/// Route prefix under which the login and staff endpoints are mounted.
///
/// Default: "/acct"
pub static ACCT_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("ACCT_ROUTE_PREFIX").unwrap_or_else(|_| "/acct".to_string()));
