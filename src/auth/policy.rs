//! Authorization policy
//!
//! One place mapping (caller claims, action) to allow/deny. Handlers call
//! `authorize` before touching the stores, so changing who may do what is a
//! policy edit rather than a routing change.

use crate::error::{AppError, AppResult};

use super::Claims;

/// Actions a caller can attempt against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a new account (admin-gated, including public signups)
    CreateAccount,
    /// Fetch a single account by row id
    GetAccount,
    /// Delete an account by row id
    DeleteAccount,
    /// Promote an account to admin
    SetAdmin,
    /// Move funds out of the named source account number
    Transfer { from_account: i64 },
    /// Read the full transfer ledger
    TransferHistory,
}

/// Decide whether `claims` may perform `action`.
///
/// Admin-gated actions require the admin claim. Transfers require the
/// caller's token to name the declared source account; admins get no bypass
/// there, an admin moves only its own funds.
pub fn authorize(claims: &Claims, action: Action) -> AppResult<()> {
    match action {
        Action::CreateAccount
        | Action::GetAccount
        | Action::DeleteAccount
        | Action::SetAdmin
        | Action::TransferHistory => {
            if claims.is_admin {
                Ok(())
            } else {
                Err(AppError::PermissionDenied)
            }
        }

        Action::Transfer { from_account } => {
            if claims.account_number == from_account {
                Ok(())
            } else {
                Err(AppError::Forbidden(
                    "not authorized: mismatched account number".to_string(),
                ))
            }
        }
    }
}
