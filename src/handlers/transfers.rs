//! Fund transfer HTTP handler.
//!
//! Implements `POST /transfer`. The handler stays thin; the validation
//! sequence and the atomic apply live in `services::transfer_service`.

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    models::transfer::{TransferRequest, TransferResponse},
    routes::AppState,
    services::transfer_service,
};

/// Transfer money between two accounts.
///
/// # Endpoint
///
/// `POST /transfer`
///
/// # Request Body
///
/// ```json
/// {
///   "from_account": 1,
///   "to_account": 3,
///   "amount": "250.00"
/// }
/// ```
///
/// # Validation
///
/// - Amount must be positive with at most two decimal places
/// - Both accounts must exist and be ACTIVE
/// - Source must have sufficient balance
/// - Today's outgoing total must stay within the configured daily limit
///
/// # Atomicity
///
/// Both balances and the transfer record are written in a single database
/// transaction. Either everything is applied or nothing is.
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    let transfer = transfer_service::execute_transfer(
        &state.pool,
        state.daily_limit_cents,
        request.from_account,
        request.to_account,
        request.amount,
    )
    .await?;

    tracing::info!(
        "transfer {} applied: {} -> {} ({} cents)",
        transfer.id,
        transfer.from_account_id,
        transfer.to_account_id,
        transfer.amount_cents
    );

    Ok(Json(transfer.into()))
}
