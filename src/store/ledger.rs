//! Transfer ledger
//!
//! Append-only log of completed transfers, keyed by account numbers. Rows
//! are stamped with the database's current time on insert.

use sqlx::{PgExecutor, PgPool};

use crate::domain::Transfer;
use crate::error::AppResult;

#[derive(Clone)]
pub struct TransferLedger {
    pool: PgPool,
}

impl TransferLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one ledger row. Executor-generic so the caller's transaction
    /// covers the append together with the balance updates.
    pub async fn record<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        from_account: i64,
        to_account: i64,
        amount: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transfer (from_account, to_account, amount, timestamp)
            VALUES ($1, $2, $3, now())
            "#,
        )
        .bind(from_account)
        .bind(to_account)
        .bind(amount)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// All ledger rows in natural storage order. No filtering, no pagination.
    pub async fn list(&self) -> AppResult<Vec<Transfer>> {
        let transfers = sqlx::query_as::<_, Transfer>("SELECT * FROM transfer")
            .fetch_all(&self.pool)
            .await?;

        Ok(transfers)
    }
}
