//! Transfer data models and API request/response types.
//!
//! This module defines:
//! - `Transfer`: Database entity representing a completed transfer
//! - `TransferRequest`: Request body for `POST /transfer`
//! - `TransferResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::money;

/// Represents a completed transfer record from the database.
///
/// # Database Table
///
/// Maps to the `transfers` table. Rows exist only for transfers that were
/// applied; rejected transfers leave no record. The per-account daily
/// outgoing total is computed by summing these rows.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transfer {
    /// Unique identifier for this transfer
    pub id: i64,

    /// Source account (debited)
    pub from_account_id: i64,

    /// Destination account (credited)
    pub to_account_id: i64,

    /// Amount in cents
    ///
    /// Always positive (enforced by CHECK constraint)
    pub amount_cents: i64,

    /// When the transfer was applied
    pub created_at: DateTime<Utc>,
}

/// Request to transfer money between accounts.
///
/// # JSON Example
///
/// ```json
/// {
///   "from_account": 1,
///   "to_account": 3,
///   "amount": "250.00"
/// }
/// ```
///
/// # Atomicity Guarantee
///
/// BOTH accounts are updated in the same database transaction.
/// If the debit fails, the credit doesn't happen, and vice versa.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Account to transfer from (will decrease)
    pub from_account: i64,

    /// Account to transfer to (will increase)
    pub to_account: i64,

    /// Amount to transfer as a decimal (at most two decimal places)
    pub amount: Decimal,
}

/// Response returned for a successful transfer.
///
/// # JSON Example
///
/// ```json
/// {
///   "transfer_id": 7,
///   "from_account": 1,
///   "to_account": 3,
///   "amount": "250.00",
///   "created_at": "2025-08-01T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub transfer_id: i64,
    pub from_account: i64,
    pub to_account: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Convert database Transfer to API TransferResponse.
impl From<Transfer> for TransferResponse {
    fn from(transfer: Transfer) -> Self {
        Self {
            transfer_id: transfer.id,
            from_account: transfer.from_account_id,
            to_account: transfer.to_account_id,
            amount: money::from_cents(transfer.amount_cents),
            created_at: transfer.created_at,
        }
    }
}
