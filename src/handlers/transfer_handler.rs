//! Transfer handler
//!
//! Debit, credit, and ledger append run in one database transaction. Both
//! account rows are locked for the duration, so the sum of balances is
//! conserved even across a mid-sequence failure or a concurrent transfer.

use sqlx::PgPool;

use crate::auth::{authorize, Action, Claims};
use crate::error::{AppError, AppResult};
use crate::store::{AccountStore, TransferLedger};

use super::{TransferCommand, TransferOutcome};

/// Handler for balance transfers
pub struct TransferHandler {
    store: AccountStore,
    ledger: TransferLedger,
    pool: PgPool,
}

impl TransferHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: AccountStore::new(pool.clone()),
            ledger: TransferLedger::new(pool.clone()),
            pool,
        }
    }

    /// Execute the transfer command.
    pub async fn execute(
        &self,
        command: TransferCommand,
        claims: &Claims,
    ) -> AppResult<TransferOutcome> {
        authorize(
            claims,
            Action::Transfer {
                from_account: command.from_account,
            },
        )?;

        if command.amount <= 0 {
            return Err(AppError::InvalidRequest(
                "transfer amount must be positive".to_string(),
            ));
        }

        if command.from_account == command.to_account {
            return Err(AppError::InvalidRequest(
                "cannot transfer to the same account".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Lock rows in ascending number order; opposing transfers would
        // otherwise deadlock.
        let (from_account, to_account) = if command.from_account < command.to_account {
            let from = self
                .store
                .get_by_number_for_update(&mut *tx, command.from_account)
                .await?;
            let to = self
                .store
                .get_by_number_for_update(&mut *tx, command.to_account)
                .await?;
            (from, to)
        } else {
            let to = self
                .store
                .get_by_number_for_update(&mut *tx, command.to_account)
                .await?;
            let from = self
                .store
                .get_by_number_for_update(&mut *tx, command.from_account)
                .await?;
            (from, to)
        };

        if from_account.balance < command.amount {
            return Err(AppError::InsufficientFunds);
        }

        self.store
            .update_balance(
                &mut *tx,
                from_account.number,
                from_account.balance - command.amount,
            )
            .await?;
        self.store
            .update_balance(
                &mut *tx,
                to_account.number,
                to_account.balance + command.amount,
            )
            .await?;
        self.ledger
            .record(
                &mut *tx,
                from_account.number,
                to_account.number,
                command.amount,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            from = from_account.number,
            to = to_account.number,
            amount = command.amount,
            "transfer completed"
        );

        Ok(TransferOutcome {
            from_account: command.from_account,
            to_account: command.to_account,
            amount: command.amount,
        })
    }
}
