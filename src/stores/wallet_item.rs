//! Defines the wallet item store trait.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error, WalletId, WalletItemId,
    models::{ItemType, WalletItem, WalletItemBuilder},
    pagination::{Page, PageRequest},
};

/// Handles the creation, retrieval and aggregation of wallet items.
pub trait WalletItemStore {
    /// Insert a new item, or update the existing item if `item` has an ID.
    ///
    /// # Errors
    /// Implementers must return:
    /// - [Error::MissingFields] if the wallet, date, type or value is missing,
    /// - [Error::InvalidWallet] if the wallet does not exist,
    /// - [Error::UpdateMissingWalletItem] if `item` has an ID that is not in the store.
    fn save(&mut self, item: WalletItemBuilder) -> Result<WalletItem, Error>;

    /// Get an item by its ID.
    fn get(&self, id: WalletItemId) -> Result<Option<WalletItem>, Error>;

    /// Delete an item by its ID.
    ///
    /// Returns [Error::DeleteMissingWalletItem] if there is no item with `id`.
    fn delete(&mut self, id: WalletItemId) -> Result<(), Error>;

    /// Delete every item.
    fn delete_all(&mut self) -> Result<(), Error>;

    /// Get one page of the wallet's items dated within `date_range` (inclusive),
    /// ordered by date and then ID.
    fn get_by_date_range(
        &self,
        wallet_id: WalletId,
        date_range: RangeInclusive<Date>,
        page: PageRequest,
    ) -> Result<Page<WalletItem>, Error>;

    /// Get all of the wallet's items of type `item_type`, ordered by date and then ID.
    fn get_by_type(&self, wallet_id: WalletId, item_type: ItemType)
    -> Result<Vec<WalletItem>, Error>;

    /// The exact sum of the values of the wallet's items, zero if it has none.
    fn sum_by_wallet(&self, wallet_id: WalletId) -> Result<Decimal, Error>;
}
