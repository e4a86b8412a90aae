//! Transfer domain type
//!
//! One completed balance movement, keyed by account numbers. Rows are
//! append-only: created as a side effect of a successful transfer, never
//! updated or deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: i64,
    pub from_account: i64,
    pub to_account: i64,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
}
