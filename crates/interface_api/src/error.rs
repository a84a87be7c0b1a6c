//! API error handling
//!
//! Every failure is rendered as `{ "error": <kind>, "message": <text> }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use domain_lending::LendingError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Lending(#[from] LendingError),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Lending(e) => match e {
                LendingError::InvalidInstallmentCount { .. }
                | LendingError::InvalidInterestRate { .. }
                | LendingError::InvalidAmount(_)
                | LendingError::Money(_)
                | LendingError::Calendar(_) => StatusCode::UNPROCESSABLE_ENTITY,
                LendingError::CustomerNotFound(_) | LendingError::LoanNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                LendingError::InsufficientCredit { .. } | LendingError::LoanAlreadyPaid(_) => {
                    StatusCode::CONFLICT
                }
                LendingError::Port(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Internal(_) => "internal_error",
            ApiError::Lending(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // storage details stay in the logs
        let message = match &self {
            ApiError::Lending(LendingError::Port(e)) => {
                error!(error = %e, "Storage failure");
                "Storage unavailable".to_string()
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal failure");
                "Internal server error".to_string()
            }
            ApiError::Lending(e) => e.to_string(),
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg) => msg.clone(),
        };

        let body = ErrorResponse {
            error: self.kind().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::TokenExpired => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::MissingPermission(_)
            | AuthError::MissingCustomerBinding
            | AuthError::CustomerAccessDenied(_) => ApiError::Forbidden(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{LoanId, PortError};

    #[test]
    fn test_domain_status_mapping() {
        let cases = [
            (LendingError::invalid_amount("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (LendingError::LoanNotFound(LoanId::new()), StatusCode::NOT_FOUND),
            (LendingError::LoanAlreadyPaid(LoanId::new()), StatusCode::CONFLICT),
            (LendingError::Port(PortError::connection("down")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), expected);
        }
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(ApiError::from(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::MissingCustomerBinding).status(),
            StatusCode::FORBIDDEN
        );
    }
}
