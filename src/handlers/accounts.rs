//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /accounts - Create new account
//! - GET /accounts/:id - Get account by ID
//! - POST /accounts/:id/status - Change account status

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;

use crate::{
    error::{self, AppError},
    models::{
        account::{
            Account, AccountResponse, AccountStatus, CreateAccountRequest, StatusChangeRequest,
            StatusChangeResponse,
        },
        money,
    },
    routes::AppState,
};

/// Create a new account.
///
/// # Endpoint
///
/// `POST /accounts`
///
/// # Request Body
///
/// ```json
/// {
///   "customer_id": 42,
///   "account_number": "ACC-1042",
///   "initial_balance": "2500.00"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created account
/// - **Error (400)**: Negative or sub-cent initial balance
/// - **Error (409)**: Account number already exists
/// - **Error (500)**: Database error
///
/// # Identifier Generation
///
/// Account ids are assigned as `max(account_id) + 1`. The max-read and the
/// insert happen in one SQL transaction so ids cannot collide.
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    if request.initial_balance < Decimal::ZERO {
        return Err(AppError::InvalidAmount(
            "initial balance must not be negative".to_string(),
        ));
    }
    let balance_cents = money::to_cents(request.initial_balance).ok_or_else(|| {
        AppError::InvalidAmount("initial balance must have at most two decimal places".to_string())
    })?;

    let customer_name = request
        .customer_name
        .unwrap_or_else(|| format!("Customer {}", request.customer_id));

    let mut tx = state.pool.begin().await?;

    let max_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(account_id), 0) FROM accounts")
        .fetch_one(&mut *tx)
        .await?;

    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts
            (account_id, customer_id, account_number, account_type,
             balance_cents, currency, status, created_at, customer_name)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING account_id, customer_id, account_number, account_type,
                  balance_cents, currency, status, created_at, customer_name
        "#,
    )
    .bind(max_id + 1)
    .bind(request.customer_id)
    .bind(&request.account_number)
    .bind(&request.account_type)
    .bind(balance_cents)
    .bind(&request.currency)
    .bind(AccountStatus::Active)
    .bind(chrono::Utc::now())
    .bind(&customer_name)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| {
        if error::is_unique_violation(&err) {
            AppError::DuplicateAccount
        } else {
            err.into()
        }
    })?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Get a specific account by ID.
///
/// # Endpoint
///
/// `GET /accounts/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: Returns account details including the denormalized
///   customer name
/// - **Error (404)**: Account not found
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT account_id, customer_id, account_number, account_type,
               balance_cents, currency, status, created_at, customer_name
        FROM accounts
        WHERE account_id = ?
        "#,
    )
    .bind(account_id)
    .fetch_optional(&state.pool)
    .await?
    // Return 404 if not found
    .ok_or(AppError::AccountNotFound)?;

    Ok(Json(account.into()))
}

/// Change an account's lifecycle status.
///
/// # Endpoint
///
/// `POST /accounts/{id}/status`
///
/// # Request Body
///
/// ```json
/// {"status": "FROZEN"}
/// ```
///
/// Any of ACTIVE, FROZEN, CLOSED may be set; unknown values are rejected at
/// deserialization time.
///
/// # Response
///
/// - **Success (200 OK)**: `{"account_id": 1, "status": "FROZEN"}`
/// - **Error (404)**: Account not found
pub async fn change_status(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<StatusChangeResponse>, AppError> {
    let updated = sqlx::query("UPDATE accounts SET status = ? WHERE account_id = ?")
        .bind(request.status)
        .bind(account_id)
        .execute(&state.pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::AccountNotFound);
    }

    tracing::info!("account {account_id} status set to {}", request.status);

    Ok(Json(StatusChangeResponse {
        account_id,
        status: request.status,
    }))
}
