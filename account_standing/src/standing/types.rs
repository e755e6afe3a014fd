use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::errors::StandingError;

/// Whether an account may use the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Enabled,
    Disabled,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Enabled => "enabled",
            AccountStatus::Disabled => "disabled",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = StandingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(AccountStatus::Enabled),
            "disabled" => Ok(AccountStatus::Disabled),
            other => Err(StandingError::InvalidStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for AccountStatus {
    type Error = StandingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Staff action submitted to change a user's standing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    Disable,
    Reenable,
}

impl AccountAction {
    pub fn target_status(&self) -> AccountStatus {
        match self {
            AccountAction::Disable => AccountStatus::Disabled,
            AccountAction::Reenable => AccountStatus::Enabled,
        }
    }

    /// Past-tense verb used in log lines and user-facing messages
    pub fn past_tense(&self) -> &'static str {
        match self {
            AccountAction::Disable => "disabled",
            AccountAction::Reenable => "reenabled",
        }
    }
}

impl FromStr for AccountAction {
    type Err = StandingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disable" => Ok(AccountAction::Disable),
            "reenable" => Ok(AccountAction::Reenable),
            other => Err(StandingError::InvalidAction(other.to_string())),
        }
    }
}

/// Moderation record for a single user.
///
/// At most one row exists per user. A user without a row is enabled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct UserStanding {
    /// Account this standing applies to
    pub user_id: String,
    #[sqlx(try_from = "String")]
    pub account_status: AccountStatus,
    /// Id of the staff account that made the latest change
    pub changed_by: String,
    pub standing_last_changed_at: DateTime<Utc>,
}

impl UserStanding {
    pub fn new(user_id: String, account_status: AccountStatus, changed_by: String) -> Self {
        Self {
            user_id,
            account_status,
            changed_by,
            standing_last_changed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum StandingSearchField {
    UserId(String),
    AccountStatus(AccountStatus),
}

impl fmt::Display for StandingSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandingSearchField::UserId(id) => write!(f, "UserId({id})"),
            StandingSearchField::AccountStatus(status) => write!(f, "AccountStatus({status})"),
        }
    }
}
