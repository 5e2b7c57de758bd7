// =============================================================================
// ERROR MODULE
// =============================================================================
// This module defines the crate's error types.
//
// - AppError: errors raised by the mock REST server, converted to HTTP
//   responses through Axum's IntoResponse
// - ApiError: errors seen by the dashboard side when the product API (the
//   collaborator) rejects or fails a request
//
// LEARNING NOTES:
// - thiserror derives Display from the #[error("...")] attributes
// - #[from] auto-implements From<X>, which is what makes `?` work
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// =============================================================================
// SERVER ERROR TYPE
// =============================================================================
#[derive(Debug, Error)]
pub enum AppError {
    /// Product not found in the mock backend
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// HTTP RESPONSE CONVERSION
// =============================================================================
// Handlers return AppResult<T>; Axum turns the error branch into a JSON body
// with a matching status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        tracing::error!(
            error_code = error_code,
            message = %message,
            "Request failed"
        );

        let body = ErrorResponse::new(error_code, message);

        (status, Json(body)).into_response()
    }
}

/// Results returned by server-side code.
pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

// =============================================================================
// COLLABORATOR ERROR TYPE
// =============================================================================
// Failures at the product API boundary. These are surfaced to the admin as a
// message; they never leave the catalog in a half-mutated state.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The addressed product does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was rejected as invalid
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(msg) => ApiError::NotFound(msg),
            AppError::BadRequest(msg) => ApiError::Rejected(msg),
            AppError::Internal(msg) => ApiError::Status {
                status: 500,
                message: msg,
            },
        }
    }
}
