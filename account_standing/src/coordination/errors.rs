//! Error types for the coordination layer

use thiserror::Error;

use crate::session::SessionError;
use crate::standing::StandingError;
use crate::storage::StorageError;
use crate::userdb::UserError;
use crate::utils::UtilError;

/// Errors returned by the public operations of this crate
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The account exists but its standing is disabled
    #[error("Account disabled: {0}")]
    AccountDisabled(String),

    /// Unauthorized access error
    #[error("Unauthorized access")]
    Unauthorized,

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller-supplied input failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found with context
    #[error("Resource not found: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Error from the user database operations
    #[error("User error: {0}")]
    UserError(UserError),

    /// Error from account standing operations
    #[error("Standing error: {0}")]
    StandingError(StandingError),

    /// Error from Session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),

    /// Error from storage backends
    #[error("Storage error: {0}")]
    StorageError(StorageError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    UtilsError(UtilError),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Authentication(msg) => tracing::error!("Authentication error: {}", msg),
            Self::AccountDisabled(username) => {
                tracing::warn!("Account disabled: {}", username)
            }
            Self::Unauthorized => tracing::error!("Unauthorized access"),
            Self::Conflict(message) => tracing::error!("Conflict: {}", message),
            Self::InvalidInput(message) => tracing::debug!("Invalid input: {}", message),
            Self::ResourceNotFound {
                resource_type,
                resource_id,
            } => tracing::error!("Resource not found: {} {}", resource_type, resource_id),
            Self::UserError(err) => tracing::error!("User error: {}", err),
            Self::StandingError(err) => tracing::error!("Standing error: {}", err),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::StorageError(err) => tracing::error!("Storage error: {}", err),
            Self::UtilsError(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }
}

// From implementations log at the point of conversion

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        let error = Self::SessionError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        let error = Self::UserError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<StandingError> for CoordinationError {
    fn from(err: StandingError) -> Self {
        let error = Self::StandingError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        let error = Self::StorageError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        let error = Self::UtilsError(err);
        tracing::error!("{}", error);
        error
    }
}
