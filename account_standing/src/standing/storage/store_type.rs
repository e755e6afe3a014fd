use crate::standing::{
    errors::StandingError,
    types::{AccountStatus, StandingSearchField, UserStanding},
};
use crate::storage::GENERIC_DATA_STORE;

use super::postgres::*;
use super::sqlite::*;

pub(crate) struct StandingStore;

impl StandingStore {
    /// Initialize the account standing table
    pub(crate) async fn init() -> Result<(), StandingError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_standing_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_standing_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(StandingError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    #[tracing::instrument(fields(standing_field = %field))]
    pub(crate) async fn get_standings_by(
        field: StandingSearchField,
    ) -> Result<Vec<UserStanding>, StandingError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_standings_by_field_sqlite(pool, &field).await
        } else if let Some(pool) = store.as_postgres() {
            get_standings_by_field_postgres(pool, &field).await
        } else {
            Err(StandingError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Raw standing row for a user, if one was ever written
    pub(crate) async fn get_standing(user_id: &str) -> Result<Option<UserStanding>, StandingError> {
        Ok(
            Self::get_standings_by(StandingSearchField::UserId(user_id.to_string()))
                .await?
                .into_iter()
                .next(),
        )
    }

    /// Status the access gate acts on. Users without a row are enabled.
    pub(crate) async fn effective_status(user_id: &str) -> Result<AccountStatus, StandingError> {
        Ok(Self::get_standing(user_id)
            .await?
            .map_or(AccountStatus::Enabled, |s| s.account_status))
    }

    /// Insert or update the single standing row for `standing.user_id`
    #[tracing::instrument(skip(standing), fields(user_id = %standing.user_id, status = %standing.account_status))]
    pub(crate) async fn upsert_standing(
        standing: UserStanding,
    ) -> Result<UserStanding, StandingError> {
        let store = GENERIC_DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            upsert_standing_sqlite(pool, standing).await
        } else if let Some(pool) = store.as_postgres() {
            upsert_standing_postgres(pool, standing).await
        } else {
            Err(StandingError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, "Standing upsert failed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_user, init_test_environment};
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_user_without_row_is_enabled() {
        init_test_environment().await;
        let user = create_test_user("no-row", false).await;

        assert!(StandingStore::get_standing(&user.id).await.unwrap().is_none());
        assert_eq!(
            StandingStore::effective_status(&user.id).await.unwrap(),
            AccountStatus::Enabled
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_upsert_creates_then_updates_single_row() {
        init_test_environment().await;
        let staff = create_test_user("row-staff", true).await;
        let target = create_test_user("row-target", false).await;

        // Given a disabled standing
        let disabled = StandingStore::upsert_standing(UserStanding::new(
            target.id.clone(),
            AccountStatus::Disabled,
            staff.id.clone(),
        ))
        .await
        .expect("Failed to disable");
        assert_eq!(disabled.account_status, AccountStatus::Disabled);
        assert_eq!(
            StandingStore::effective_status(&target.id).await.unwrap(),
            AccountStatus::Disabled
        );

        // When re-enabling
        StandingStore::upsert_standing(UserStanding::new(
            target.id.clone(),
            AccountStatus::Enabled,
            staff.id.clone(),
        ))
        .await
        .expect("Failed to re-enable");

        // Then there is still exactly one row, now enabled
        let rows =
            StandingStore::get_standings_by(StandingSearchField::UserId(target.id.clone()))
                .await
                .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account_status, AccountStatus::Enabled);
        assert_eq!(rows[0].changed_by, staff.id);
    }

    #[tokio::test]
    #[serial]
    async fn test_search_by_status() {
        init_test_environment().await;
        let staff = create_test_user("status-staff", true).await;
        let target = create_test_user("status-target", false).await;

        StandingStore::upsert_standing(UserStanding::new(
            target.id.clone(),
            AccountStatus::Disabled,
            staff.id.clone(),
        ))
        .await
        .unwrap();

        let disabled =
            StandingStore::get_standings_by(StandingSearchField::AccountStatus(
                AccountStatus::Disabled,
            ))
            .await
            .unwrap();

        assert!(disabled.iter().any(|s| s.user_id == target.id));
        assert!(
            disabled
                .iter()
                .all(|s| s.account_status == AccountStatus::Disabled)
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_standing_for_unknown_user_is_rejected() {
        init_test_environment().await;

        let result = StandingStore::upsert_standing(UserStanding::new(
            "no-such-user".to_string(),
            AccountStatus::Disabled,
            "staff".to_string(),
        ))
        .await;

        assert!(matches!(result, Err(StandingError::Storage(_))));
    }
}
