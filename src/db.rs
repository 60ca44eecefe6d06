/*! This module defines the schema of the application's database and the traits
used to map models to and from it. */

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    stores::sqlite::{SQLiteUserStore, SQLiteWalletItemStore, SQLiteWalletStore},
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// Implementations use `CREATE TABLE IF NOT EXISTS` so that calling this
    /// on an existing database is a no-op.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
///
/// # Examples
/// ```
/// use rusqlite::{Connection, Row};
///
/// use wallet_rs::db::MapRow;
///
/// struct Account {
///     id: i64,
///     label: String,
/// }
///
/// impl MapRow for Account {
///     type ReturnType = Self;
///
///     fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
///         Ok(Self {
///             id: row.get(offset)?,
///             label: row.get(offset + 1)?,
///         })
///     }
/// }
///
/// let conn = Connection::open_in_memory().unwrap();
/// conn.execute("CREATE TABLE account (id INTEGER PRIMARY KEY, label TEXT NOT NULL)", ())
///     .unwrap();
/// conn.execute("INSERT INTO account (label) VALUES ('savings')", ()).unwrap();
///
/// let account = conn
///     .query_row("SELECT id, label FROM account", [], Account::map_row)
///     .unwrap();
///
/// assert_eq!(account.id, 1);
/// assert_eq!(account.label, "savings");
/// ```
pub trait MapRow {
    /// The type the row is mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from column `offset` onwards.
    ///
    /// This is useful in cases where tables have been joined and you want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for the domain models and enable foreign key checks.
///
/// Foreign key enforcement is a per-connection setting in SQLite, so this must
/// be called on every connection before the stores use it.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteWalletStore::create_table(&transaction)?;
    SQLiteWalletItemStore::create_table(&transaction)?;

    transaction.commit()?;

    tracing::debug!("initialized database schema");

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("Could not initialize database");

        let names = table_names(&conn);
        for want in ["user", "user_wallet", "wallet", "wallet_item"] {
            assert!(
                names.iter().any(|name| name == want),
                "table {want} missing from {names:?}"
            );
        }
    }

    #[test]
    fn enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        let enabled: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn can_initialize_twice() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();

        assert_eq!(initialize(&conn), Ok(()));
    }
}
