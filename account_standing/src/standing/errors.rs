use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum StandingError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown account status: {0}")]
    InvalidStatus(String),

    #[error("Unexpected account action: {0}")]
    InvalidAction(String),
}
