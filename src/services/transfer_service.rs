//! Transfer service - Core business logic for moving funds between accounts.
//!
//! This service handles:
//! - The ordered validation sequence for transfers
//! - The daily outgoing-limit accumulation
//! - Atomic balance updates and transfer recording
//!
//! # Atomicity Guarantees
//!
//! Debit, credit, and the transfer record are applied within one SQL
//! transaction. The database ensures all-or-nothing execution.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{Account, AccountStatus},
        money,
        transfer::Transfer,
    },
};

/// Execute a transfer between two accounts.
///
/// # Validation Sequence
///
/// Checks run in a fixed order; the first failure determines the reported
/// error:
///
/// 1. Amount is positive with at most two decimal places
/// 2. Source and destination differ
/// 3. Source account exists and is ACTIVE
/// 4. Destination account exists and is ACTIVE
/// 5. Source balance covers the amount
/// 6. Today's outgoing total plus this amount stays within the daily limit
///
/// # Process
///
/// On success, within a single database transaction:
/// debit source, credit destination, insert the transfer record, commit.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `daily_limit_cents` - Configured per-day outgoing limit, in cents
/// * `from_account` - Source account identifier
/// * `to_account` - Destination account identifier
/// * `amount` - Decimal amount to move
///
/// # Errors
///
/// - `InvalidAmount`: Amount is not positive or has sub-cent precision
/// - `InvalidRequest`: Source and destination are the same account
/// - `AccountNotFound`: Either account doesn't exist
/// - `AccountNotActive`: Either account is FROZEN or CLOSED
/// - `InsufficientFunds`: Source balance is too low
/// - `DailyLimitExceeded`: Cumulative outgoing total for today would pass the limit
/// - `Database`: Database error occurred
pub async fn execute_transfer(
    pool: &DbPool,
    daily_limit_cents: i64,
    from_account: i64,
    to_account: i64,
    amount: Decimal,
) -> Result<Transfer, AppError> {
    // Validate amount before touching the database
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount(
            "amount must be positive".to_string(),
        ));
    }
    let amount_cents = money::to_cents(amount).ok_or_else(|| {
        AppError::InvalidAmount("amount must have at most two decimal places".to_string())
    })?;

    // Prevent transferring to same account
    if from_account == to_account {
        return Err(AppError::InvalidRequest(
            "from_account and to_account must differ".to_string(),
        ));
    }

    // Start database transaction; every read below sees a consistent snapshot
    // and the single-connection pool keeps concurrent transfers serialized.
    let mut tx = pool.begin().await?;

    // Source must exist and be ACTIVE
    let source = fetch_account(&mut tx, from_account)
        .await?
        .ok_or(AppError::AccountNotFound)?;
    if source.status != AccountStatus::Active {
        tx.rollback().await?;
        return Err(AppError::AccountNotActive {
            account_id: source.account_id,
            status: source.status,
        });
    }

    // Destination must exist and be ACTIVE
    let destination = fetch_account(&mut tx, to_account)
        .await?
        .ok_or(AppError::AccountNotFound)?;
    if destination.status != AccountStatus::Active {
        tx.rollback().await?;
        return Err(AppError::AccountNotActive {
            account_id: destination.account_id,
            status: destination.status,
        });
    }

    // Balance check
    if source.balance_cents < amount_cents {
        tx.rollback().await?;
        return Err(AppError::InsufficientFunds);
    }

    // Daily limit: sum of today's completed outgoing transfers plus this one
    let now = Utc::now();
    let sent_today = outgoing_total_cents(&mut tx, from_account, now).await?;
    if sent_today + amount_cents > daily_limit_cents {
        tx.rollback().await?;
        return Err(AppError::DailyLimitExceeded {
            limit: money::from_cents(daily_limit_cents),
            sent_today: money::from_cents(sent_today),
            attempted: amount,
        });
    }

    // Apply both balance changes
    sqlx::query("UPDATE accounts SET balance_cents = balance_cents - ? WHERE account_id = ?")
        .bind(amount_cents)
        .bind(from_account)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE accounts SET balance_cents = balance_cents + ? WHERE account_id = ?")
        .bind(amount_cents)
        .bind(to_account)
        .execute(&mut *tx)
        .await?;

    // Record the transfer
    let transfer = sqlx::query_as::<_, Transfer>(
        r#"
        INSERT INTO transfers (from_account_id, to_account_id, amount_cents, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, from_account_id, to_account_id, amount_cents, created_at
        "#,
    )
    .bind(from_account)
    .bind(to_account)
    .bind(amount_cents)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    // Commit ALL changes atomically
    tx.commit().await?;

    Ok(transfer)
}

/// Fetch an account by id within the current transaction.
async fn fetch_account(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    account_id: i64,
) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT account_id, customer_id, account_number, account_type,
               balance_cents, currency, status, created_at, customer_name
        FROM accounts
        WHERE account_id = ?
        "#,
    )
    .bind(account_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(account)
}

/// Sum of amounts sent by an account today (UTC calendar day).
async fn outgoing_total_cents(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    from_account: i64,
    now: DateTime<Utc>,
) -> Result<i64, AppError> {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + chrono::Duration::days(1);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount_cents), 0)
        FROM transfers
        WHERE from_account_id = ? AND created_at >= ? AND created_at < ?
        "#,
    )
    .bind(from_account)
    .bind(day_start)
    .bind(day_end)
    .fetch_one(&mut **tx)
    .await?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn test_pool() -> DbPool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        db::run_migrations(&pool).await.expect("migrations");
        pool
    }

    async fn insert_account(pool: &DbPool, account_id: i64, balance_cents: i64, status: &str) {
        sqlx::query(
            r#"
            INSERT INTO accounts
                (account_id, customer_id, account_number, account_type,
                 balance_cents, currency, status, created_at, customer_name)
            VALUES (?, ?, ?, 'SAVINGS', ?, 'INR', ?, ?, NULL)
            "#,
        )
        .bind(account_id)
        .bind(account_id)
        .bind(format!("ACC-{account_id}"))
        .bind(balance_cents)
        .bind(status)
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("insert account");
    }

    async fn balance_cents(pool: &DbPool, account_id: i64) -> i64 {
        sqlx::query_scalar("SELECT balance_cents FROM accounts WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(pool)
            .await
            .expect("balance")
    }

    async fn transfer_count(pool: &DbPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transfers")
            .fetch_one(pool)
            .await
            .expect("count")
    }

    const LIMIT: i64 = 20_000_000_00; // 20,000,000.00 in cents

    #[tokio::test]
    async fn successful_transfer_debits_and_credits_exactly() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 100_000, "ACTIVE").await;
        insert_account(&pool, 2, 5_000, "ACTIVE").await;

        let transfer = execute_transfer(&pool, LIMIT, 1, 2, dec("250.00"))
            .await
            .expect("transfer succeeds");

        assert_eq!(transfer.from_account_id, 1);
        assert_eq!(transfer.to_account_id, 2);
        assert_eq!(transfer.amount_cents, 25_000);

        assert_eq!(balance_cents(&pool, 1).await, 75_000);
        assert_eq!(balance_cents(&pool, 2).await, 30_000);
        // Total across the pair is preserved
        assert_eq!(
            balance_cents(&pool, 1).await + balance_cents(&pool, 2).await,
            105_000
        );
    }

    #[tokio::test]
    async fn overdraft_is_rejected_and_balances_unchanged() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 10_000, "ACTIVE").await;
        insert_account(&pool, 2, 0, "ACTIVE").await;

        let err = execute_transfer(&pool, LIMIT, 1, 2, dec("100.01"))
            .await
            .expect_err("overdraft rejected");

        assert!(matches!(err, AppError::InsufficientFunds));
        assert_eq!(balance_cents(&pool, 1).await, 10_000);
        assert_eq!(balance_cents(&pool, 2).await, 0);
        assert_eq!(transfer_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn frozen_source_cannot_transfer() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 100_000, "FROZEN").await;
        insert_account(&pool, 2, 0, "ACTIVE").await;

        let err = execute_transfer(&pool, LIMIT, 1, 2, dec("1.00"))
            .await
            .expect_err("frozen source rejected");

        assert!(matches!(
            err,
            AppError::AccountNotActive {
                account_id: 1,
                status: AccountStatus::Frozen
            }
        ));
        assert_eq!(balance_cents(&pool, 2).await, 0);
    }

    #[tokio::test]
    async fn closed_destination_cannot_receive() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 100_000, "ACTIVE").await;
        insert_account(&pool, 2, 0, "CLOSED").await;

        let err = execute_transfer(&pool, LIMIT, 1, 2, dec("1.00"))
            .await
            .expect_err("closed destination rejected");

        assert!(matches!(
            err,
            AppError::AccountNotActive {
                account_id: 2,
                status: AccountStatus::Closed
            }
        ));
        assert_eq!(balance_cents(&pool, 1).await, 100_000);
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 100_000, "ACTIVE").await;

        let err = execute_transfer(&pool, LIMIT, 1, 99, dec("1.00"))
            .await
            .expect_err("missing destination");
        assert!(matches!(err, AppError::AccountNotFound));

        let err = execute_transfer(&pool, LIMIT, 99, 1, dec("1.00"))
            .await
            .expect_err("missing source");
        assert!(matches!(err, AppError::AccountNotFound));
    }

    #[tokio::test]
    async fn daily_limit_accumulates_across_transfers() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 1_000_000, "ACTIVE").await;
        insert_account(&pool, 2, 0, "ACTIVE").await;

        // Limit of 100.00 per day
        let limit = 10_000;

        execute_transfer(&pool, limit, 1, 2, dec("60.00"))
            .await
            .expect("first transfer within limit");

        // 60 + 50 > 100 -> rejected
        let err = execute_transfer(&pool, limit, 1, 2, dec("50.00"))
            .await
            .expect_err("second transfer passes the limit");
        assert!(matches!(
            err,
            AppError::DailyLimitExceeded { sent_today, .. } if sent_today == dec("60.00")
        ));

        // 60 + 40 == 100 -> still allowed (limit is inclusive)
        execute_transfer(&pool, limit, 1, 2, dec("40.00"))
            .await
            .expect("transfer exactly at the limit");

        assert_eq!(balance_cents(&pool, 1).await, 990_000);
        assert_eq!(balance_cents(&pool, 2).await, 10_000);
        assert_eq!(transfer_count(&pool).await, 2);
    }

    #[tokio::test]
    async fn limit_only_counts_outgoing_transfers() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 100_000, "ACTIVE").await;
        insert_account(&pool, 2, 100_000, "ACTIVE").await;

        let limit = 10_000;

        // Incoming funds must not eat into account 2's own daily allowance
        execute_transfer(&pool, limit, 1, 2, dec("100.00"))
            .await
            .expect("1 -> 2");
        execute_transfer(&pool, limit, 2, 1, dec("100.00"))
            .await
            .expect("2 -> 1 still allowed");
    }

    #[tokio::test]
    async fn non_positive_and_sub_cent_amounts_are_invalid() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 100_000, "ACTIVE").await;
        insert_account(&pool, 2, 0, "ACTIVE").await;

        for bad in ["0", "-5.00"] {
            let err = execute_transfer(&pool, LIMIT, 1, 2, dec(bad))
                .await
                .expect_err("non-positive amount rejected");
            assert!(matches!(err, AppError::InvalidAmount(_)));
        }

        let err = execute_transfer(&pool, LIMIT, 1, 2, dec("1.005"))
            .await
            .expect_err("sub-cent amount rejected");
        assert!(matches!(err, AppError::InvalidAmount(_)));

        assert_eq!(transfer_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn self_transfer_is_rejected() {
        let pool = test_pool().await;
        insert_account(&pool, 1, 100_000, "ACTIVE").await;

        let err = execute_transfer(&pool, LIMIT, 1, 1, dec("1.00"))
            .await
            .expect_err("self transfer rejected");
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert_eq!(balance_cents(&pool, 1).await, 100_000);
    }

    #[tokio::test]
    async fn amount_check_runs_before_account_lookup() {
        let pool = test_pool().await;

        // Neither account exists, but the invalid amount is reported first.
        let err = execute_transfer(&pool, LIMIT, 98, 99, dec("-1"))
            .await
            .expect_err("amount checked first");
        assert!(matches!(err, AppError::InvalidAmount(_)));
    }
}
