//! Implements a SQLite backed wallet store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};
use rust_decimal::Decimal;

use crate::{
    Error, WalletId,
    db::{CreateTable, MapRow},
    models::{UserID, Wallet, decimal_from_row},
    stores::WalletStore,
};

use super::{SQLiteWalletItemStore, lock};

/// Creates, retrieves and deletes wallets.
///
/// Deleting a wallet also deletes its items and user links through the
/// foreign key cascades, so the connection must have foreign keys enabled.
#[derive(Debug, Clone)]
pub struct SQLiteWalletStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteWalletStore {
    /// Create a new store from the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl WalletStore for SQLiteWalletStore {
    fn create(&mut self, name: &str, value: Decimal) -> Result<Wallet, Error> {
        let wallet = lock(&self.connection)?
            .prepare("INSERT INTO wallet (name, value) VALUES (?1, ?2) RETURNING id, name, value")?
            .query_row((name, value.to_string()), Self::map_row)?;

        tracing::debug!("created wallet {}", wallet.id);

        Ok(wallet)
    }

    /// Overwrite the name and value of the wallet with the ID of `wallet`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingWallet] if the wallet does not exist, or
    /// [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, wallet: &Wallet) -> Result<Wallet, Error> {
        lock(&self.connection)?
            .prepare(
                "UPDATE wallet SET name = ?1, value = ?2 WHERE id = ?3
                 RETURNING id, name, value",
            )?
            .query_row(
                (&wallet.name, wallet.value.to_string(), wallet.id),
                Self::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingWallet,
                error => error.into(),
            })
    }

    fn get(&self, id: WalletId) -> Result<Option<Wallet>, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, value FROM wallet WHERE id = :id")?
            .query_row(&[(":id", &id)], Self::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    fn delete(&mut self, id: WalletId) -> Result<(), Error> {
        let rows_affected =
            lock(&self.connection)?.execute("DELETE FROM wallet WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingWallet);
        }

        tracing::debug!("deleted wallet {id}");

        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), Error> {
        let deleted = lock(&self.connection)?.execute("DELETE FROM wallet", ())?;

        tracing::debug!("deleted {deleted} wallet(s)");

        Ok(())
    }

    /// Set the value of the wallet to the sum of its items.
    ///
    /// The sum and the update run in one exclusive SQL transaction so that no
    /// item can be written in between. The transaction is rolled back if any
    /// step fails.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingWallet] if the wallet does not exist, or
    /// [Error::SqlError] if there is some other SQL error.
    fn reconcile_value(&mut self, id: WalletId) -> Result<Wallet, Error> {
        let mut connection = lock(&self.connection)?;
        let transaction = connection.transaction_with_behavior(TransactionBehavior::Exclusive)?;

        let total = SQLiteWalletItemStore::sum_values(&transaction, id)?;

        let wallet = transaction
            .prepare("UPDATE wallet SET value = ?1 WHERE id = ?2 RETURNING id, name, value")?
            .query_row((total.to_string(), id), Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingWallet,
                error => error.into(),
            })?;

        transaction.commit()?;

        tracing::debug!("reconciled wallet {id} to {total}");

        Ok(wallet)
    }

    /// Give the user access to the wallet.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidWallet] if the wallet does not exist,
    /// - [Error::InvalidUser] if the user does not exist,
    /// - [Error::DuplicateUserWallet] if the user already has access,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn add_user(&mut self, wallet_id: WalletId, user_id: UserID) -> Result<(), Error> {
        let connection = lock(&self.connection)?;

        let result = connection.execute(
            "INSERT INTO user_wallet (user_id, wallet_id) VALUES (?1, ?2)",
            (user_id.as_i64(), wallet_id),
        );

        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            )) => {
                // SQLite does not say which reference failed.
                let wallet_exists: bool = connection.query_row(
                    "SELECT EXISTS(SELECT 1 FROM wallet WHERE id = ?1)",
                    (wallet_id,),
                    |row| row.get(0),
                )?;

                return Err(if wallet_exists {
                    Error::InvalidUser(user_id)
                } else {
                    Error::InvalidWallet(wallet_id)
                });
            }
            Err(error) => return Err(error.into()),
        }

        tracing::debug!("gave user {user_id} access to wallet {wallet_id}");

        Ok(())
    }

    fn user_has_access(&self, wallet_id: WalletId, user_id: UserID) -> Result<bool, Error> {
        lock(&self.connection)?
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM user_wallet WHERE user_id = ?1 AND wallet_id = ?2)",
                (user_id.as_i64(), wallet_id),
                |row| row.get(0),
            )
            .map_err(|error| error.into())
    }

    fn get_for_user(&self, user_id: UserID) -> Result<Vec<Wallet>, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT wallet.id, wallet.name, wallet.value FROM wallet
                 INNER JOIN user_wallet ON user_wallet.wallet_id = wallet.id
                 WHERE user_wallet.user_id = :user_id
                 ORDER BY wallet.id ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_wallet| maybe_wallet.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SQLiteWalletStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS wallet (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                value TEXT NOT NULL
            )",
            (),
        )?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS user_wallet (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                wallet_id INTEGER NOT NULL,
                UNIQUE(user_id, wallet_id),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(wallet_id) REFERENCES wallet(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteWalletStore {
    type ReturnType = Wallet;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Wallet {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            value: decimal_from_row(row, offset + 2)?,
        })
    }
}
