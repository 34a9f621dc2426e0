//! Mapping of domain errors onto HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use validator::ValidationErrors;

use h2h_core::errors::{DomainError, ErrorKind};
use h2h_shared::errors::{error_codes, ErrorResponse};

/// Message shown for every 500; details stay in the logs
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// An error ready to be rendered as a JSON [`ErrorResponse`]
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(code, message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_INPUT, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error_codes::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            INTERNAL_MESSAGE,
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorResponse {
        &self.body
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.body.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(&self.body)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error.kind() {
            ErrorKind::Internal => {
                tracing::error!(error = %error, "Request failed with internal error");
                return ApiError::internal();
            }
            kind => tracing::debug!(error = %error, kind = ?kind, "Request rejected"),
        }

        match error {
            DomainError::InvalidInput { message } => ApiError::bad_request(message),
            DomainError::Validation(e) => ApiError::bad_request(e.to_string()),
            DomainError::Conflict { message } => {
                ApiError::new(StatusCode::CONFLICT, error_codes::CONFLICT, message)
            }
            DomainError::Unauthorized { message } => ApiError::unauthorized(message),
            DomainError::Token(_) => ApiError::unauthorized("Invalid or expired access token"),
            DomainError::Forbidden { message } => ApiError::forbidden(message),
            DomainError::NotFound { resource } => {
                ApiError::not_found(format!("{} not found", resource))
            }
            DomainError::Internal { .. } => ApiError::internal(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();

        let mut error = ApiError::bad_request("Invalid request data");
        error.body = error.body.add_detail("fields", fields);
        error
    }
}

/// Render a domain error as an HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    ApiError::from(error).error_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use h2h_core::errors::{TokenError, ValidationError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::Validation(ValidationError::InvalidEmail), 400),
            (DomainError::Conflict { message: "taken".into() }, 409),
            (DomainError::unauthorized("Invalid email or password"), 401),
            (DomainError::Token(TokenError::Expired), 401),
            (DomainError::forbidden("nope"), 403),
            (DomainError::not_found("User"), 404),
            (DomainError::internal("db down"), 500),
            (DomainError::Token(TokenError::GenerationFailed), 500),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status().as_u16(), status);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = ApiError::from(DomainError::internal("connection refused at 10.0.0.3"));
        assert_eq!(error.body().message, INTERNAL_MESSAGE);
        assert_eq!(error.body().error, "INTERNAL_ERROR");
    }

    #[test]
    fn test_messages_pass_through() {
        let error = ApiError::from(DomainError::Validation(ValidationError::PasswordTooShort {
            min: 10,
        }));
        assert_eq!(error.body().message, "Password must be at least 10 characters long");

        let error = ApiError::from(DomainError::not_found("NGO"));
        assert_eq!(error.body().message, "NGO not found");
    }
}
