//! Persistence module
//!
//! Pool-holding stores over the `account` and `transfer` tables.

pub mod account;
pub mod ledger;

pub use account::AccountStore;
pub use ledger::TransferLedger;
