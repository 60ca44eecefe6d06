//! SQLite backed implementations of the [stores](crate::stores).
//!
//! Every store holds a handle to the same shared connection. The connection
//! should be set up with [initialize](crate::db::initialize) before use so that
//! the tables exist and foreign keys are enforced.

mod user;
mod wallet;
mod wallet_item;

pub use user::SQLiteUserStore;
pub use wallet::SQLiteWalletStore;
pub use wallet_item::SQLiteWalletItemStore;

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::Error;

/// Acquire the database lock.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|_| Error::DatabaseLockError)
}

/// Convert a count or offset to the integer type SQLite uses.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
