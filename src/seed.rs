//! CSV bootstrap for an empty database.
//!
//! On process start, if the `accounts` table is empty, it is populated from a
//! CSV file (path configurable via `SEED_CSV_PATH`). Malformed rows are
//! skipped with a warning rather than aborting startup; a missing file is a
//! no-op.
//!
//! Expected columns: `account_id, customer_id, account_number, account_type,
//! balance, currency, status, created_at` and optionally `customer_name`.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    db::DbPool,
    error,
    models::{account::AccountStatus, money},
};

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct SeedRow {
    account_id: i64,
    #[serde(default)]
    customer_id: Option<i64>,
    account_number: String,
    #[serde(default)]
    account_type: Option<String>,
    #[serde(default)]
    balance: Option<Decimal>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    status: Option<AccountStatus>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    customer_name: Option<String>,
}

/// A seed row normalized into insertable column values.
struct SeedAccount {
    account_id: i64,
    customer_id: i64,
    account_number: String,
    account_type: String,
    balance_cents: i64,
    currency: String,
    status: AccountStatus,
    created_at: DateTime<Utc>,
    customer_name: String,
}

impl TryFrom<SeedRow> for SeedAccount {
    type Error = String;

    fn try_from(row: SeedRow) -> Result<Self, Self::Error> {
        let balance = row.balance.unwrap_or(Decimal::ZERO);
        if balance < Decimal::ZERO {
            return Err(format!("negative balance {balance}"));
        }
        let balance_cents = money::to_cents(balance)
            .ok_or_else(|| format!("balance {balance} has sub-cent precision"))?;

        // Empty created_at falls back to now; a present but unparseable value
        // marks the row malformed.
        let created_at = match row.created_at.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| format!("bad created_at {raw:?}: {e}"))?
                .and_utc(),
            None => Utc::now(),
        };

        let customer_id = row.customer_id.unwrap_or(0);

        Ok(Self {
            account_id: row.account_id,
            customer_id,
            account_number: row.account_number,
            account_type: row.account_type.unwrap_or_else(|| "SAVINGS".to_string()),
            balance_cents,
            currency: row.currency.unwrap_or_else(|| "INR".to_string()),
            status: row.status.unwrap_or(AccountStatus::Active),
            created_at,
            customer_name: row
                .customer_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Customer {customer_id}")),
        })
    }
}

/// Populate the accounts table from a CSV file if it is currently empty.
///
/// Returns the number of accounts inserted (0 when the table already has
/// rows or the file does not exist).
pub async fn seed_if_empty(pool: &DbPool, csv_path: &str) -> anyhow::Result<usize> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::debug!("accounts table already populated, skipping seed");
        return Ok(0);
    }

    if !Path::new(csv_path).exists() {
        tracing::info!("seed file {csv_path} not found, starting with empty database");
        return Ok(0);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("opening seed file {csv_path}"))?;

    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for (line, result) in rdr.deserialize::<SeedRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!("skipping seed row {}: {err}", line + 1);
                continue;
            }
        };

        let account = match SeedAccount::try_from(row) {
            Ok(account) => account,
            Err(reason) => {
                tracing::warn!("skipping seed row {}: {reason}", line + 1);
                continue;
            }
        };

        let insert = sqlx::query(
            r#"
            INSERT INTO accounts
                (account_id, customer_id, account_number, account_type,
                 balance_cents, currency, status, created_at, customer_name)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.account_id)
        .bind(account.customer_id)
        .bind(&account.account_number)
        .bind(&account.account_type)
        .bind(account.balance_cents)
        .bind(&account.currency)
        .bind(account.status)
        .bind(account.created_at)
        .bind(&account.customer_name)
        .execute(&mut *tx)
        .await;

        match insert {
            Ok(_) => inserted += 1,
            Err(err) if error::is_unique_violation(&err) => {
                tracing::warn!(
                    "skipping seed row {}: duplicate account {}",
                    line + 1,
                    account.account_id
                );
            }
            Err(err) => return Err(err).context("inserting seed account"),
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use std::io::Write;
    use tempfile::NamedTempFile;

    async fn test_pool() -> DbPool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        db::run_migrations(&pool).await.expect("migrations");
        pool
    }

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        write!(file, "{contents}").unwrap();
        file
    }

    #[tokio::test]
    async fn seeds_accounts_and_skips_malformed_rows() {
        let pool = test_pool().await;
        let file = csv_file(
            "account_id,customer_id,account_number,account_type,balance,currency,status,created_at,customer_name\n\
             1,10,ACC-001,SAVINGS,1000.50,INR,ACTIVE,2025-08-01 09:00:00,Asha Rao\n\
             2,11,ACC-002,CURRENT,250.00,INR,FROZEN,2025-08-01 09:05:00,\n\
             not-a-number,12,ACC-003,SAVINGS,10.00,INR,ACTIVE,2025-08-01 09:10:00,Bad Row\n\
             3,13,ACC-004,SAVINGS,-5.00,INR,ACTIVE,2025-08-01 09:15:00,Negative\n\
             4,14,ACC-005,SAVINGS,7.125,INR,ACTIVE,2025-08-01 09:20:00,SubCent\n",
        );

        let inserted = seed_if_empty(&pool, file.path().to_str().unwrap())
            .await
            .expect("seed");
        assert_eq!(inserted, 2);

        let (balance, status, name): (i64, AccountStatus, String) = sqlx::query_as(
            "SELECT balance_cents, status, customer_name FROM accounts WHERE account_id = 1",
        )
        .fetch_one(&pool)
        .await
        .expect("seeded account");
        assert_eq!(balance, 100_050);
        assert_eq!(status, AccountStatus::Active);
        assert_eq!(name, "Asha Rao");

        // Missing customer_name falls back to the generated projection
        let (status, name): (AccountStatus, String) =
            sqlx::query_as("SELECT status, customer_name FROM accounts WHERE account_id = 2")
                .fetch_one(&pool)
                .await
                .expect("frozen account");
        assert_eq!(status, AccountStatus::Frozen);
        assert_eq!(name, "Customer 11");
    }

    #[tokio::test]
    async fn does_not_reseed_a_populated_table() {
        let pool = test_pool().await;
        let file = csv_file(
            "account_id,customer_id,account_number,account_type,balance,currency,status,created_at,customer_name\n\
             1,10,ACC-001,SAVINGS,100.00,INR,ACTIVE,2025-08-01 09:00:00,Asha Rao\n",
        );
        let path = file.path().to_str().unwrap().to_string();

        assert_eq!(seed_if_empty(&pool, &path).await.expect("first seed"), 1);
        assert_eq!(seed_if_empty(&pool, &path).await.expect("second seed"), 0);
    }

    #[tokio::test]
    async fn missing_file_is_a_noop() {
        let pool = test_pool().await;
        let inserted = seed_if_empty(&pool, "no-such-file.csv").await.expect("seed");
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn duplicate_account_numbers_are_skipped() {
        let pool = test_pool().await;
        let file = csv_file(
            "account_id,customer_id,account_number,account_type,balance,currency,status,created_at,customer_name\n\
             1,10,ACC-001,SAVINGS,100.00,INR,ACTIVE,2025-08-01 09:00:00,A\n\
             2,11,ACC-001,SAVINGS,200.00,INR,ACTIVE,2025-08-01 09:05:00,B\n",
        );

        let inserted = seed_if_empty(&pool, file.path().to_str().unwrap())
            .await
            .expect("seed");
        assert_eq!(inserted, 1);
    }
}
