//! Wallet is a ledger for personal finances.
//!
//! Users own wallets, wallets accumulate dated income and expense entries
//! ("wallet items"), and the library computes exact decimal balances and
//! date-ranged pages of entries.
//!
//! This library provides the domain models, SQLite backed stores, and a thin
//! service layer for wallet items. The `wallet` binary exposes these as a
//! command line tool.

#![warn(missing_docs)]

mod app_state;
mod database_id;
pub mod db;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod services;
pub mod stores;

pub use app_state::{AppState, create_app_state};
pub use database_id::{WalletId, WalletItemId};
pub use db::initialize as initialize_db;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A wallet item was saved without one or more of its required fields.
    ///
    /// The payload lists the name of every missing field.
    #[error("constraint violation: missing required field(s) {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The email used to create or update a user is already in use.
    #[error("constraint violation: the email is already in use")]
    DuplicateEmail,

    /// The wallet ID used to save a wallet item or link a user does not refer
    /// to a wallet in the database.
    #[error("constraint violation: no wallet with the ID {0}")]
    InvalidWallet(WalletId),

    /// The user ID used to link a wallet does not refer to a user in the
    /// database.
    #[error("constraint violation: no user with the ID {0}")]
    InvalidUser(models::UserID),

    /// The user already has access to the wallet.
    #[error("constraint violation: the user already has access to the wallet")]
    DuplicateUserWallet,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging, never shown to
    /// the person typing the password.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string could not be parsed as an email address.
    #[error("invalid email address \"{0}\"")]
    InvalidEmail(String),

    /// The string is not one of the wallet item type codes.
    #[error("invalid wallet item type \"{0}\", expected EN (income) or SD (expense)")]
    InvalidItemType(String),

    /// The string could not be parsed as a decimal number.
    #[error("invalid decimal value \"{0}\"")]
    InvalidDecimal(String),

    /// The total value of a wallet's items is too large to represent.
    #[error("the total value of the items of wallet {0} is too large")]
    SumOverflow(WalletId),

    /// The requested resource was not found.
    ///
    /// Lookups return `None` instead of this error. Internally, this error
    /// may occur when a query that must return a row returns none.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a user that does not exist
    #[error("tried to update a user that is not in the database")]
    UpdateMissingUser,

    /// Tried to update a wallet that does not exist
    #[error("tried to update a wallet that is not in the database")]
    UpdateMissingWallet,

    /// Tried to delete a wallet that does not exist
    #[error("tried to delete a wallet that is not in the database")]
    DeleteMissingWallet,

    /// Tried to update a wallet item that does not exist
    #[error("tried to update a wallet item that is not in the database")]
    UpdateMissingWalletItem,

    /// Tried to delete a wallet item that does not exist
    #[error("tried to delete a wallet item that is not in the database")]
    DeleteMissingWalletItem,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// Whether the error was caused by data that breaks a database or model
    /// constraint (missing required fields, uniqueness, or references).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::MissingFields(_)
                | Error::DuplicateEmail
                | Error::InvalidWallet(_)
                | Error::InvalidUser(_)
                | Error::DuplicateUserWallet
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.contains("user_wallet.") =>
            {
                Error::DuplicateUserWallet
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use rusqlite::Connection;

    use crate::Error;

    #[test]
    fn maps_no_rows_to_not_found() {
        let conn = Connection::open_in_memory().unwrap();

        let result: Result<i64, Error> = conn
            .query_row("SELECT 1 WHERE 1 = 0", [], |row| row.get(0))
            .map_err(Error::from);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn missing_fields_is_constraint_violation() {
        let error = Error::MissingFields(vec!["wallet", "value"]);

        assert!(error.is_constraint_violation());
        assert_eq!(
            error.to_string(),
            "constraint violation: missing required field(s) wallet, value"
        );
    }

    #[test]
    fn not_found_is_not_constraint_violation() {
        assert!(!Error::NotFound.is_constraint_violation());
        assert!(!Error::DatabaseLockError.is_constraint_violation());
    }
}
