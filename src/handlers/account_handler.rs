//! Account creation handler

use sqlx::PgPool;

use crate::auth::{authorize, Action, Claims};
use crate::domain::Account;
use crate::error::{AppError, AppResult};
use crate::store::AccountStore;

use super::CreateAccountCommand;

/// Handler for account creation
pub struct CreateAccountHandler {
    store: AccountStore,
}

impl CreateAccountHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: AccountStore::new(pool),
        }
    }

    /// Execute the create account command.
    ///
    /// Creation is admin-gated, signups included. The admin flag on the new
    /// account is honored only for admin callers; `authorize` already
    /// guarantees that here, the explicit check keeps the rule visible if
    /// the gate is ever relaxed.
    pub async fn execute(&self, command: CreateAccountCommand, claims: &Claims) -> AppResult<Account> {
        authorize(claims, Action::CreateAccount)?;

        if command.first_name.is_empty() || command.last_name.is_empty() {
            return Err(AppError::InvalidRequest(
                "first name and last name are required".to_string(),
            ));
        }

        if command.is_admin && !claims.is_admin {
            return Err(AppError::Forbidden(
                "only admin can create accounts with isAdmin=true".to_string(),
            ));
        }

        let account = Account::new(
            command.first_name,
            command.last_name,
            &command.password,
            command.balance,
        )?;

        let stored = self.store.create(account, command.is_admin).await?;

        tracing::info!(
            id = stored.id,
            number = stored.number,
            is_admin = stored.is_admin,
            "account created"
        );

        Ok(stored)
    }
}
