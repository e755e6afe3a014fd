use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::User as SessionUser;
use crate::standing::{AccountAction, AccountStatus, StandingSearchField, StandingStore, UserStanding};
use crate::userdb::{UserSearchField, UserStore};

use super::errors::CoordinationError;

/// A disabled account as shown on the staff management page
#[derive(Debug, Clone, Serialize)]
pub struct DisabledAccount {
    pub user_id: String,
    pub username: String,
    /// Username of the staff member who disabled the account
    pub changed_by: String,
    pub standing_last_changed_at: DateTime<Utc>,
}

/// Disable or re-enable the account named `username`.
///
/// `action` must be `"disable"` or `"reenable"`. The user is looked up first,
/// then the action is checked, and only then is the standing row written.
pub async fn update_account_standing(
    staff: &SessionUser,
    username: &str,
    action: &str,
) -> Result<UserStanding, CoordinationError> {
    if !staff.is_staff {
        tracing::debug!("User {} is not authorized to change account standing", staff.id);
        return Err(CoordinationError::Unauthorized.log());
    }

    let username = username.trim();
    if username.is_empty() {
        return Err(CoordinationError::InvalidInput("Please enter a username".to_string()).log());
    }

    let target = UserStore::get_user_by(UserSearchField::Username(username.to_string()))
        .await?
        .ok_or_else(|| {
            CoordinationError::ResourceNotFound {
                resource_type: "User".to_string(),
                resource_id: username.to_string(),
            }
            .log()
        })?;

    let action: AccountAction = action.parse().map_err(|_| {
        CoordinationError::InvalidInput("Unexpected account status".to_string()).log()
    })?;

    let standing = StandingStore::upsert_standing(UserStanding::new(
        target.id.clone(),
        action.target_status(),
        staff.id.clone(),
    ))
    .await?;

    tracing::info!(
        staff_id = %staff.id,
        user_id = %target.id,
        "{} {} {}'s account",
        staff.username,
        action.past_tense(),
        target.username
    );

    Ok(standing)
}

/// All currently disabled accounts, most recently changed first
pub async fn list_disabled_accounts(
    staff: &SessionUser,
) -> Result<Vec<DisabledAccount>, CoordinationError> {
    if !staff.is_staff {
        tracing::debug!("User {} is not authorized to list disabled accounts", staff.id);
        return Err(CoordinationError::Unauthorized.log());
    }

    let standings =
        StandingStore::get_standings_by(StandingSearchField::AccountStatus(AccountStatus::Disabled))
            .await?;

    let mut accounts = Vec::with_capacity(standings.len());
    for standing in standings {
        let Some(user) = UserStore::get_user(&standing.user_id).await? else {
            tracing::warn!(user_id = %standing.user_id, "Standing row without a user");
            continue;
        };
        let changed_by = UserStore::get_user(&standing.changed_by)
            .await?
            .map_or(standing.changed_by, |staff| staff.username);

        accounts.push(DisabledAccount {
            user_id: user.id,
            username: user.username,
            changed_by,
            standing_last_changed_at: standing.standing_last_changed_at,
        });
    }

    Ok(accounts)
}

/// Effective status of a user. Users never moderated are enabled.
pub async fn get_account_status(user_id: &str) -> Result<AccountStatus, CoordinationError> {
    Ok(StandingStore::effective_status(user_id).await?)
}

/// The stored standing row for a user, if one exists
pub async fn get_user_standing(user_id: &str) -> Result<Option<UserStanding>, CoordinationError> {
    Ok(StandingStore::get_standing(user_id).await?)
}
