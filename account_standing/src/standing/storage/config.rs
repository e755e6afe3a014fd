use std::{env, sync::LazyLock};

use crate::storage::DB_TABLE_PREFIX;

/// Account standing table name
pub(super) static DB_TABLE_USER_STANDING: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_USER_STANDING")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "user_standing"))
});
