//! Command definitions
//!
//! Commands represent intentions to change the system state.

use serde::{Deserialize, Serialize};

/// Command to create a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountCommand {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub balance: i64,
    pub is_admin: bool,
}

impl CreateAccountCommand {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: String::new(),
            balance: 0,
            is_admin: false,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_balance(mut self, balance: i64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

/// Command to move funds between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    /// Source account number (must match the caller's token)
    pub from_account: i64,
    /// Destination account number
    pub to_account: i64,
    /// Whole-unit amount, no subunit modeling
    pub amount: i64,
}

impl TransferCommand {
    pub fn new(from_account: i64, to_account: i64, amount: i64) -> Self {
        Self {
            from_account,
            to_account,
            amount,
        }
    }
}

/// Result of a completed transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub from_account: i64,
    pub to_account: i64,
    pub amount: i64,
}
