//! Shared setup for tests that touch the stores

use std::sync::Once;

use crate::userdb::{User, UserStore, hash_password};

/// Load `.env_test` once and make sure every table exists.
///
/// Table creation is idempotent, so this is safe to call at the top of each test.
pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        // Start every run from an empty database file
        if let Some(db_path) = std::env::var("GENERIC_DATA_STORE_URL")
            .ok()
            .as_deref()
            .and_then(sqlite_file_path)
        {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{db_path}{suffix}"));
            }
        }
    });

    if let Err(e) = crate::init().await {
        eprintln!("Warning: Failed to initialize stores: {e}");
    }
}

/// File behind a `sqlite:` URL, or `None` for in-memory and non-SQLite URLs
fn sqlite_file_path(url: &str) -> Option<&str> {
    let path = url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("file:").unwrap_or(path);
    let path = path.strip_prefix("//").unwrap_or(path);
    let path = path.split('?').next()?;

    if path.is_empty() || path.contains(":memory:") || url.contains("mode=memory") {
        return None;
    }
    Some(path)
}

/// Name that will not collide with other tests sharing the database
pub fn unique_name(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{prefix}-{nanos}-{}", uuid::Uuid::new_v4().simple())
}

/// Insert a user whose password is `"test"`
pub async fn create_test_user(suffix: &str, is_staff: bool) -> User {
    let mut user = User::new(
        unique_name(suffix),
        hash_password("test").expect("Failed to hash password"),
    );
    user.is_staff = is_staff;
    UserStore::upsert_user(user)
        .await
        .expect("Failed to create test user")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(sqlite_file_path("sqlite:/tmp/test.db"), Some("/tmp/test.db"));
        assert_eq!(sqlite_file_path("sqlite:./test.db"), Some("./test.db"));
        assert_eq!(sqlite_file_path("sqlite:///tmp/test.db"), Some("/tmp/test.db"));
        assert_eq!(
            sqlite_file_path("sqlite:file:/tmp/test.db?mode=rwc"),
            Some("/tmp/test.db")
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("sqlite:file:acct?mode=memory&cache=shared"), None);
        assert_eq!(sqlite_file_path("postgresql://localhost/test"), None);
    }
}
