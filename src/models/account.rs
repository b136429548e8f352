//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing a bank account
//! - `AccountStatus`: ACTIVE / FROZEN / CLOSED lifecycle states
//! - `CreateAccountRequest` / `StatusChangeRequest`: Request bodies
//! - `AccountResponse` / `StatusChangeResponse`: Response bodies

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::money;

/// Lifecycle status of an account.
///
/// Only ACTIVE accounts may originate or receive transfers. Stored as TEXT
/// in the database and rendered uppercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Frozen,
    Closed,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Frozen => "FROZEN",
            AccountStatus::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table.
///
/// # Balance Storage
///
/// Balances are stored as `i64` cents to avoid floating-point precision issues.
///
/// For example:
/// - 10.50 is stored as 1050 cents
/// - 100.00 is stored as 10000 cents
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Account {
    /// Unique identifier for this account
    pub account_id: i64,

    /// Identifier of the owning customer
    pub customer_id: i64,

    /// Human-facing account number (unique)
    pub account_number: String,

    /// Account type (e.g. "SAVINGS", "CURRENT")
    pub account_type: String,

    /// Current balance in cents (not whole currency units)
    ///
    /// Must be >= 0 (enforced by database CHECK constraint).
    pub balance_cents: i64,

    /// Currency code (ISO 4217, 3 letters)
    pub currency: String,

    /// Lifecycle status
    pub status: AccountStatus,

    /// Timestamp when account was created
    pub created_at: DateTime<Utc>,

    /// Denormalized customer display name.
    ///
    /// A read-optimized projection, not a canonical source; the customer
    /// record itself lives outside this service.
    pub customer_name: Option<String>,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "customer_id": 42,
///   "account_number": "ACC-1042",
///   "account_type": "SAVINGS",
///   "initial_balance": "2500.00",
///   "currency": "INR",
///   "customer_name": "Asha Rao"
/// }
/// ```
///
/// # Validation
///
/// - `account_number`: Required, must be unique
/// - `initial_balance`: Optional, defaults to 0; must be >= 0 with at most
///   two decimal places
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Owning customer identifier
    pub customer_id: i64,

    /// Unique account number
    pub account_number: String,

    /// Account type (defaults to "SAVINGS" if not provided)
    #[serde(default = "default_account_type")]
    pub account_type: String,

    /// Opening balance (defaults to 0 if not provided)
    #[serde(default)]
    pub initial_balance: Decimal,

    /// Currency code (defaults to "INR" if not provided)
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Optional display name; falls back to "Customer {customer_id}"
    pub customer_name: Option<String>,
}

fn default_account_type() -> String {
    "SAVINGS".to_string()
}

/// Default currency value when not specified in request.
fn default_currency() -> String {
    "INR".to_string()
}

/// Request body for `POST /accounts/{id}/status`.
///
/// Unknown status values are rejected during deserialization.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: AccountStatus,
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_id": 1042,
///   "customer_id": 42,
///   "account_number": "ACC-1042",
///   "account_type": "SAVINGS",
///   "balance": "2500.00",
///   "currency": "INR",
///   "status": "ACTIVE",
///   "customer_name": "Asha Rao",
///   "created_at": "2025-08-01T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub account_id: i64,
    pub customer_id: i64,
    pub account_number: String,
    pub account_type: String,

    /// Current balance as a decimal amount
    pub balance: Decimal,

    pub currency: String,
    pub status: AccountStatus,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response body for status changes.
#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    pub account_id: i64,
    pub status: AccountStatus,
}

/// Convert database Account to API AccountResponse.
///
/// Re-expands the stored cents into a decimal balance.
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.account_id,
            customer_id: account.customer_id,
            account_number: account.account_number,
            account_type: account.account_type,
            balance: money::from_cents(account.balance_cents),
            currency: account.currency,
            status: account.status,
            customer_name: account.customer_name,
            created_at: account.created_at,
        }
    }
}
