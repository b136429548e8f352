//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;

use crate::models::account::AccountStatus;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Resource Errors**: Requested accounts not found
/// - **Business Logic Errors**: Transfers that violate status, balance or
///   daily-limit rules
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// An account with the same account number already exists.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Account number already exists")]
    DuplicateAccount,

    /// Account is FROZEN or CLOSED and cannot take part in a transfer.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Account {account_id} has status {status} and cannot transact")]
    AccountNotActive {
        account_id: i64,
        status: AccountStatus,
    },

    /// Source account has insufficient balance for the transfer.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// The transfer would push today's outgoing total past the daily limit.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error(
        "Daily transfer limit exceeded: limit={limit}, already_transferred_today={sent_today}, attempting={attempted}"
    )]
    DailyLimitExceeded {
        limit: Decimal,
        sent_today: Decimal,
        attempted: Decimal,
    },

    /// Amount is zero, negative, or has more than two decimal places.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// True if the underlying driver error is a UNIQUE constraint violation.
///
/// Used to turn an INSERT race on `account_number` into a 409 instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `AccountNotFound` → 404 Not Found
/// - `DuplicateAccount` → 409 Conflict
/// - `AccountNotActive` / `InsufficientFunds` / `DailyLimitExceeded` → 422 Unprocessable Entity
/// - `InvalidAmount` / `InvalidRequest` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            AppError::DuplicateAccount => {
                (StatusCode::CONFLICT, "duplicate_account", self.to_string())
            }
            AppError::AccountNotActive { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "account_not_active",
                self.to_string(),
            ),
            AppError::InsufficientFunds => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_funds",
                self.to_string(),
            ),
            AppError::DailyLimitExceeded { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "daily_limit_exceeded",
                self.to_string(),
            ),
            AppError::InvalidAmount(_) => {
                (StatusCode::BAD_REQUEST, "invalid_amount", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
