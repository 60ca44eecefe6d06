//! Bundles the stores and services that share one database connection.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    pagination::PaginationConfig,
    services::WalletItemService,
    stores::sqlite::{SQLiteUserStore, SQLiteWalletItemStore, SQLiteWalletStore},
};

/// The stores and services of the application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store for users.
    pub user_store: SQLiteUserStore,

    /// The store for wallets and the users that can access them.
    pub wallet_store: SQLiteWalletStore,

    /// The service for recording and querying wallet items.
    pub wallet_item_service: WalletItemService<SQLiteWalletItemStore>,

    /// The database connection shared by the stores.
    pub db_connection: Arc<Mutex<Connection>>,
}

/// Create an [AppState] with a SQLite database connection.
///
/// This function will initialize the database by adding the tables for the domain models.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(
    db_connection: Connection,
    pagination_config: PaginationConfig,
) -> Result<AppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState {
        user_store: SQLiteUserStore::new(connection.clone()),
        wallet_store: SQLiteWalletStore::new(connection.clone()),
        wallet_item_service: WalletItemService::new(
            SQLiteWalletItemStore::new(connection.clone()),
            pagination_config,
        ),
        db_connection: connection,
    })
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        models::{ItemType, WalletItem},
        pagination::PaginationConfig,
        stores::WalletStore,
    };

    use super::create_app_state;

    #[test]
    fn stores_share_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let mut state = create_app_state(conn, PaginationConfig::default()).unwrap();

        let wallet = state.wallet_store.create("Carteira", dec!(0)).unwrap();
        state
            .wallet_item_service
            .save(WalletItem::build(
                wallet.id,
                date!(2024 - 03 - 10),
                ItemType::Income,
                dec!(42.5),
            ))
            .unwrap();
        let reconciled = state.wallet_store.reconcile_value(wallet.id).unwrap();

        assert_eq!(reconciled.value, dec!(42.5));
    }
}
