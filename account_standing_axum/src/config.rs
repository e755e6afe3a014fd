//! Configuration for the axum integration

use std::sync::LazyLock;

use account_standing::ACCT_ROUTE_PREFIX;
use chrono_tz::Tz;

/// URL anonymous users are sent to when a page needs a login.
/// Default: "/acct/login"
pub static ACCT_LOGIN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("ACCT_LOGIN_URL").unwrap_or_else(|_| format!("{}/login", *ACCT_ROUTE_PREFIX))
});

/// Where logout lands
pub static ACCT_REDIRECT_ANON: LazyLock<String> =
    LazyLock::new(|| std::env::var("ACCT_REDIRECT_ANON").unwrap_or_else(|_| "/".to_string()));

/// Where a successful login lands
pub static ACCT_REDIRECT_USER: LazyLock<String> =
    LazyLock::new(|| std::env::var("ACCT_REDIRECT_USER").unwrap_or_else(|_| "/".to_string()));

pub(crate) static ACCT_RESPOND_WITH_X_CSRF_TOKEN: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("ACCT_RESPOND_WITH_X_CSRF_TOKEN")
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or(true)
});

/// Contact address shown to users whose account has been disabled
pub(crate) static ACCT_SUPPORT_EMAIL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("ACCT_SUPPORT_EMAIL").unwrap_or_else(|_| "support@example.com".to_string())
});

/// Timezone used to display change times on the staff page. Any IANA name.
/// Default: "UTC"
pub(crate) static ACCT_DISPLAY_TIMEZONE: LazyLock<Tz> = LazyLock::new(|| {
    let name = std::env::var("ACCT_DISPLAY_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
    name.parse::<Tz>().unwrap_or_else(|_| {
        tracing::warn!("Unknown ACCT_DISPLAY_TIMEZONE {}, using UTC", name);
        Tz::UTC
    })
});
