use http::StatusCode;
use session_identity::CoordinationError;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Map `CoordinationError` variants to HTTP status codes
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                CoordinationError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                CoordinationError::AccessDenied => StatusCode::UNAUTHORIZED,
                CoordinationError::Token(_) => StatusCode::UNAUTHORIZED,
                CoordinationError::EmailTaken => StatusCode::BAD_REQUEST,
                CoordinationError::IdentityConflict => StatusCode::CONFLICT,
                CoordinationError::AuthCancelled => StatusCode::BAD_REQUEST,
                CoordinationError::InvalidState => StatusCode::BAD_REQUEST,
                CoordinationError::OAuth2(_) => StatusCode::BAD_REQUEST,
                CoordinationError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_are_unauthorized() {
        let result: Result<(), _> = Err(CoordinationError::InvalidCredentials);
        let (status, _) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let result: Result<(), _> = Err(CoordinationError::AccessDenied);
        let (status, _) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_identity_conflict_is_conflict() {
        let result: Result<(), _> = Err(CoordinationError::IdentityConflict);
        let (status, _) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_email_taken_is_bad_request() {
        let result: Result<(), _> = Err(CoordinationError::EmailTaken);
        let (status, _) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_resource_not_found_is_not_found() {
        let result: Result<(), _> = Err(CoordinationError::ResourceNotFound {
            resource_type: "User".to_string(),
            resource_id: "u1".to_string(),
        });
        let (status, _) = result.into_response_error().unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_ok_passes_through() {
        let result: Result<u32, CoordinationError> = Ok(42);
        assert_eq!(result.into_response_error().unwrap(), 42);
    }
}
