//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::TokenError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation and business-rule errors. The transport conflates these at
    // 400 with a descriptive message.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("not authenticated")]
    Unauthenticated,

    #[error("insufficient balance for transfer")]
    InsufficientFunds,

    #[error("account {0} not found")]
    AccountNotFound(i64),

    #[error("account with number [{0}] not found")]
    AccountNumberNotFound(i64),

    // Authentication / authorization failures (403)
    #[error("permission denied")]
    PermissionDenied,

    #[error("{0}")]
    Forbidden(String),

    // Server errors (5xx)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        // All token failures collapse into the permission-denied envelope;
        // the reason only goes to the log.
        tracing::debug!("token rejected: {err}");
        AppError::PermissionDenied
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Uniform error envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidRequest(_)
            | AppError::Unauthenticated
            | AppError::InsufficientFunds
            | AppError::AccountNotFound(_)
            | AppError::AccountNumberNotFound(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::PermissionDenied | AppError::Forbidden(_) => {
                (StatusCode::FORBIDDEN, self.to_string())
            }

            AppError::Database(e) => {
                tracing::error!("database error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        let resp = AppError::InsufficientFunds.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::AccountNumberNotFound(42).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn permission_errors_map_to_403() {
        let resp = AppError::PermissionDenied.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = AppError::Forbidden("nope".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_errors_do_not_leak_detail() {
        let err = AppError::Database(sqlx::Error::PoolClosed);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_includes_number() {
        let err = AppError::AccountNumberNotFound(340938);
        assert_eq!(err.to_string(), "account with number [340938] not found");
    }
}
