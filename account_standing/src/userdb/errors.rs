use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Password hashing error: {0}")]
    Password(String),
}

impl From<serde_json::Error> for UserError {
    fn from(err: serde_json::Error) -> Self {
        UserError::InvalidData(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();

        let user_error = UserError::from(json_error);

        match user_error {
            UserError::InvalidData(msg) => assert!(msg.contains("expected value")),
            _ => panic!("Expected InvalidData variant"),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            UserError::Password("bad salt".into()).to_string(),
            "Password hashing error: bad salt"
        );
    }
}
