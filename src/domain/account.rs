//! Account domain type
//!
//! An account carries a surrogate row id plus a random public account number.
//! The password is stored as an argon2 hash and never serialized.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use sqlx::FromRow;

use crate::auth::password;
use crate::error::{AppError, AppResult};

/// Upper bound (exclusive) for generated account numbers
pub const ACCOUNT_NUMBER_RANGE: i64 = 1_000_000;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub balance: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a new account with a freshly generated number and hashed
    /// password. The id is assigned by the store on insert.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: &str,
        balance: i64,
    ) -> AppResult<Self> {
        let encrypted_password = password::hash_password(password)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        Ok(Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            number: random_number(),
            encrypted_password,
            balance,
            is_admin: false,
            created_at: Utc::now(),
        })
    }

    /// Compare a candidate password against the stored hash.
    pub fn valid_password(&self, candidate: &str) -> bool {
        password::verify_password(candidate, &self.encrypted_password)
    }
}

/// Draw a random public account number in `0..ACCOUNT_NUMBER_RANGE`.
pub fn random_number() -> i64 {
    rand::thread_rng().gen_range(0..ACCOUNT_NUMBER_RANGE)
}
