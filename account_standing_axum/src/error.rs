use account_standing::CoordinationError;
use http::{Result as HttpResponse, StatusCode};

/// Helper trait for converting errors to a standard response error format
pub(crate) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Map coordination failures to status codes.
///
/// Staff routes turn `Unauthorized` into 404 themselves before this mapping is reached.
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                CoordinationError::Authentication(_) => StatusCode::UNAUTHORIZED,
                CoordinationError::Unauthorized => StatusCode::UNAUTHORIZED,
                CoordinationError::AccountDisabled(_) => StatusCode::FORBIDDEN,
                CoordinationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                CoordinationError::ResourceNotFound { .. } => StatusCode::BAD_REQUEST,
                CoordinationError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// Implementation for http::Error (used by Response::builder())
impl<T> IntoResponseError<T> for HttpResponse<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}
