//! Implements a SQLite backed wallet item store.
use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error, WalletId, WalletItemId,
    db::{CreateTable, MapRow},
    models::{ItemType, ValidWalletItem, WalletItem, WalletItemBuilder, decimal_from_row},
    pagination::{Page, PageRequest},
    stores::WalletItemStore,
};

use super::{lock, to_sql_int};

/// Stores wallet items in a SQLite database.
///
/// Note that because a wallet item belongs to a [Wallet](crate::models::Wallet),
/// the wallet table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteWalletItemStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteWalletItemStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Sum the values of the wallet's items.
    ///
    /// SQLite would sum the text values as floating point numbers, so the
    /// values are added up as decimals instead.
    ///
    /// # Errors
    /// Returns [Error::SumOverflow] if the total does not fit in a [Decimal].
    pub(crate) fn sum_values(
        connection: &Connection,
        wallet_id: WalletId,
    ) -> Result<Decimal, Error> {
        let mut statement =
            connection.prepare("SELECT value FROM wallet_item WHERE wallet_id = :wallet_id")?;

        let mut total = Decimal::ZERO;
        for value in statement.query_map(&[(":wallet_id", &wallet_id)], |row| {
            decimal_from_row(row, 0)
        })? {
            total = total
                .checked_add(value?)
                .ok_or(Error::SumOverflow(wallet_id))?;
        }

        Ok(total)
    }

    fn insert(connection: &Connection, item: ValidWalletItem) -> Result<WalletItem, rusqlite::Error> {
        connection
            .prepare(
                "INSERT INTO wallet_item (wallet_id, date, type, description, value)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, wallet_id, date, type, description, value",
            )?
            .query_row(
                (
                    item.wallet_id,
                    item.date,
                    item.item_type,
                    &item.description,
                    item.value.to_string(),
                ),
                Self::map_row,
            )
    }

    fn update(
        connection: &Connection,
        id: WalletItemId,
        item: ValidWalletItem,
    ) -> Result<WalletItem, rusqlite::Error> {
        connection
            .prepare(
                "UPDATE wallet_item
                 SET wallet_id = ?1, date = ?2, type = ?3, description = ?4, value = ?5
                 WHERE id = ?6
                 RETURNING id, wallet_id, date, type, description, value",
            )?
            .query_row(
                (
                    item.wallet_id,
                    item.date,
                    item.item_type,
                    &item.description,
                    item.value.to_string(),
                    id,
                ),
                Self::map_row,
            )
    }
}

impl WalletItemStore for SQLiteWalletItemStore {
    /// Insert a new wallet item, or update the item with the builder's ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if the wallet, date, type or value is missing,
    /// - [Error::InvalidWallet] if the wallet ID does not refer to a wallet,
    /// - [Error::UpdateMissingWalletItem] if the builder has an ID that does not refer to an item,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn save(&mut self, item: WalletItemBuilder) -> Result<WalletItem, Error> {
        let item = item.validate()?;
        let wallet_id = item.wallet_id;
        let id = item.id;
        let connection = lock(&self.connection)?;

        let result = match id {
            Some(id) => Self::update(&connection, id, item),
            None => Self::insert(&connection, item),
        };

        let saved = result.map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidWallet(wallet_id),
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingWalletItem,
            error => error.into(),
        })?;

        tracing::debug!("saved wallet item {} for wallet {}", saved.id, saved.wallet_id);

        Ok(saved)
    }

    fn get(&self, id: WalletItemId) -> Result<Option<WalletItem>, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT id, wallet_id, date, type, description, value FROM wallet_item
                 WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    fn delete(&mut self, id: WalletItemId) -> Result<(), Error> {
        let rows_affected =
            lock(&self.connection)?.execute("DELETE FROM wallet_item WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingWalletItem);
        }

        tracing::debug!("deleted wallet item {id}");

        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), Error> {
        let deleted = lock(&self.connection)?.execute("DELETE FROM wallet_item", ())?;

        tracing::debug!("deleted {deleted} wallet item(s)");

        Ok(())
    }

    /// Get one page of the wallet's items dated within `date_range`.
    ///
    /// Items are sorted by date, and then ID to keep the order stable after updates.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if:
    /// - SQL query preparation or execution fails
    /// - Wallet item row mapping fails
    fn get_by_date_range(
        &self,
        wallet_id: WalletId,
        date_range: RangeInclusive<Date>,
        page: PageRequest,
    ) -> Result<Page<WalletItem>, Error> {
        let connection = lock(&self.connection)?;
        let (start, end) = date_range.into_inner();

        let total_elements: i64 = connection.query_row(
            "SELECT COUNT(id) FROM wallet_item
             WHERE wallet_id = ?1 AND date BETWEEN ?2 AND ?3",
            (wallet_id, start, end),
            |row| row.get(0),
        )?;

        let content = connection
            .prepare(
                "SELECT id, wallet_id, date, type, description, value FROM wallet_item
                 WHERE wallet_id = ?1 AND date BETWEEN ?2 AND ?3
                 ORDER BY date ASC, id ASC
                 LIMIT ?4 OFFSET ?5",
            )?
            .query_map(
                (
                    wallet_id,
                    start,
                    end,
                    to_sql_int(page.page_size),
                    to_sql_int(page.offset()),
                ),
                Self::map_row,
            )?
            .map(|maybe_item| maybe_item.map_err(Error::SqlError))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(
            content,
            page,
            u64::try_from(total_elements).unwrap_or_default(),
        ))
    }

    fn get_by_type(
        &self,
        wallet_id: WalletId,
        item_type: ItemType,
    ) -> Result<Vec<WalletItem>, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT id, wallet_id, date, type, description, value FROM wallet_item
                 WHERE wallet_id = ?1 AND type = ?2
                 ORDER BY date ASC, id ASC",
            )?
            .query_map((wallet_id, item_type), Self::map_row)?
            .map(|maybe_item| maybe_item.map_err(Error::SqlError))
            .collect()
    }

    /// The sum of the values of the wallet's items, or zero if it has none.
    ///
    /// # Errors
    /// Returns [Error::SumOverflow] if the total does not fit in a [Decimal], or
    /// [Error::SqlError] if a stored value is not a decimal or there is some other SQL error.
    fn sum_by_wallet(&self, wallet_id: WalletId) -> Result<Decimal, Error> {
        let connection = lock(&self.connection)?;

        Self::sum_values(&connection, wallet_id)
    }
}

impl CreateTable for SQLiteWalletItemStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS wallet_item (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                wallet_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('EN', 'SD')),
                description TEXT NOT NULL DEFAULT '',
                value TEXT NOT NULL,
                FOREIGN KEY(wallet_id) REFERENCES wallet(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        // Used by the date range query.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_wallet_item_wallet_date ON wallet_item(wallet_id, date)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteWalletItemStore {
    type ReturnType = WalletItem;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(WalletItem {
            id: row.get(offset)?,
            wallet_id: row.get(offset + 1)?,
            date: row.get(offset + 2)?,
            item_type: row.get(offset + 3)?,
            description: row.get(offset + 4)?,
            value: decimal_from_row(row, offset + 5)?,
        })
    }
}
