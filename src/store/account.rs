//! Account store
//!
//! CRUD over `account` rows. Accounts are mutated only through the explicit
//! update calls here; the balance update is executor-generic so the transfer
//! transaction can run it on its own connection.

use sqlx::{PgExecutor, PgPool};

use crate::domain::{account, Account};
use crate::error::{AppError, AppResult};

/// Attempts before giving up on drawing an unused account number
const NUMBER_ATTEMPTS: u32 = 5;

#[derive(Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account and return the persisted row.
    ///
    /// The random account number can collide with an existing row; the
    /// UNIQUE constraint reports that, and the number is regenerated for a
    /// bounded number of attempts.
    pub async fn create(&self, mut account: Account, is_admin: bool) -> AppResult<Account> {
        for attempt in 0..NUMBER_ATTEMPTS {
            let result = sqlx::query_as::<_, Account>(
                r#"
                INSERT INTO account
                    (first_name, last_name, number, encrypted_password, balance, is_admin, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.number)
            .bind(&account.encrypted_password)
            .bind(account.balance)
            .bind(is_admin)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(stored) => return Ok(stored),
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    tracing::debug!(
                        number = account.number,
                        attempt,
                        "account number collision, regenerating"
                    );
                    account.number = account::random_number();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(
            "could not allocate a unique account number".to_string(),
        ))
    }

    /// Persist the admin flag. No other field is updated here.
    pub async fn update(&self, account: &Account) -> AppResult<()> {
        sqlx::query("UPDATE account SET is_admin = $1 WHERE id = $2")
            .bind(account.is_admin)
            .bind(account.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Overwrite the balance of the account with the given number.
    pub async fn update_balance<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        number: i64,
        new_balance: i64,
    ) -> AppResult<()> {
        sqlx::query("UPDATE account SET balance = $1 WHERE number = $2")
            .bind(new_balance)
            .bind(number)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Delete by row id. Deleting a missing id is not an error.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, id: i64) -> AppResult<Account> {
        sqlx::query_as::<_, Account>("SELECT * FROM account WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    pub async fn get_by_number(&self, number: i64) -> AppResult<Account> {
        sqlx::query_as::<_, Account>("SELECT * FROM account WHERE number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::AccountNumberNotFound(number))
    }

    /// Row-locked read used inside the transfer transaction.
    pub async fn get_by_number_for_update<'e>(
        &self,
        executor: impl PgExecutor<'e>,
        number: i64,
    ) -> AppResult<Account> {
        sqlx::query_as::<_, Account>("SELECT * FROM account WHERE number = $1 FOR UPDATE")
            .bind(number)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::AccountNumberNotFound(number))
    }

    pub async fn list(&self) -> AppResult<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM account")
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }
}
