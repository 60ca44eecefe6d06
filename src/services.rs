//! Services that sit between callers and the stores.

use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error, WalletId,
    models::{ItemType, WalletItem, WalletItemBuilder},
    pagination::{Page, PageRequest, PaginationConfig},
    stores::WalletItemStore,
};

/// Records and queries the items of wallets.
///
/// The service passes calls through to its store, filling in the page size
/// from its [PaginationConfig].
#[derive(Debug, Clone)]
pub struct WalletItemService<S>
where
    S: WalletItemStore,
{
    store: S,
    pagination_config: PaginationConfig,
}

impl<S> WalletItemService<S>
where
    S: WalletItemStore,
{
    /// Create a service over `store`.
    pub fn new(store: S, pagination_config: PaginationConfig) -> Self {
        Self {
            store,
            pagination_config,
        }
    }

    /// The store the service delegates to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The store the service delegates to.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Insert a new item, or update an existing one if `item` has an ID.
    ///
    /// # Errors
    /// Returns the store's error, see [WalletItemStore::save].
    pub fn save(&mut self, item: WalletItemBuilder) -> Result<WalletItem, Error> {
        tracing::debug!("saving wallet item {:?}", item);
        self.store.save(item)
    }

    /// Get page `page_index` (zero-based) of the wallet's items dated from
    /// `start` to `end` inclusive.
    pub fn find_between_dates(
        &self,
        wallet_id: WalletId,
        start: Date,
        end: Date,
        page_index: u64,
    ) -> Result<Page<WalletItem>, Error> {
        tracing::debug!("finding items of wallet {wallet_id} between {start} and {end}");
        let page = PageRequest::new(page_index, self.pagination_config.default_page_size);

        self.store.get_by_date_range(wallet_id, start..=end, page)
    }

    /// Get every item of the wallet with type `item_type`.
    pub fn find_by_wallet_and_type(
        &self,
        wallet_id: WalletId,
        item_type: ItemType,
    ) -> Result<Vec<WalletItem>, Error> {
        tracing::debug!("finding {item_type} items of wallet {wallet_id}");
        self.store.get_by_type(wallet_id, item_type)
    }

    /// The total value of the wallet's items.
    pub fn sum_by_wallet_id(&self, wallet_id: WalletId) -> Result<Decimal, Error> {
        tracing::debug!("summing items of wallet {wallet_id}");
        self.store.sum_by_wallet(wallet_id)
    }
}

#[cfg(test)]
mod wallet_item_service_tests {
    use std::{
        cell::RefCell,
        ops::RangeInclusive,
        sync::{Arc, Mutex},
    };

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, Duration, macros::date};

    use crate::{
        Error, WalletId, WalletItemId,
        db::initialize,
        models::{ItemType, WalletItem, WalletItemBuilder},
        pagination::{Page, PageRequest, PaginationConfig},
        stores::{
            WalletItemStore, WalletStore,
            sqlite::{SQLiteWalletItemStore, SQLiteWalletStore},
        },
    };

    use super::WalletItemService;

    const DATE: Date = date!(2024 - 03 - 10);

    /// Records the page requests it receives and otherwise returns canned values.
    #[derive(Default)]
    struct SpyWalletItemStore {
        page_requests: RefCell<Vec<PageRequest>>,
        items: Vec<WalletItem>,
        total: Decimal,
    }

    impl WalletItemStore for SpyWalletItemStore {
        fn save(&mut self, item: WalletItemBuilder) -> Result<WalletItem, Error> {
            let item = item.validate()?;
            let saved = WalletItem {
                id: self.items.len() as WalletItemId + 1,
                wallet_id: item.wallet_id,
                date: item.date,
                item_type: item.item_type,
                description: item.description,
                value: item.value,
            };
            self.items.push(saved.clone());

            Ok(saved)
        }

        fn get(&self, _id: WalletItemId) -> Result<Option<WalletItem>, Error> {
            todo!()
        }

        fn delete(&mut self, _id: WalletItemId) -> Result<(), Error> {
            todo!()
        }

        fn delete_all(&mut self) -> Result<(), Error> {
            todo!()
        }

        fn get_by_date_range(
            &self,
            _wallet_id: WalletId,
            _date_range: RangeInclusive<Date>,
            page: PageRequest,
        ) -> Result<Page<WalletItem>, Error> {
            self.page_requests.borrow_mut().push(page);

            Ok(Page::new(Vec::new(), page, 0))
        }

        fn get_by_type(
            &self,
            wallet_id: WalletId,
            item_type: ItemType,
        ) -> Result<Vec<WalletItem>, Error> {
            Ok(self
                .items
                .iter()
                .filter(|item| item.wallet_id == wallet_id && item.item_type == item_type)
                .cloned()
                .collect())
        }

        fn sum_by_wallet(&self, _wallet_id: WalletId) -> Result<Decimal, Error> {
            Ok(self.total)
        }
    }

    #[test]
    fn find_between_dates_uses_configured_page_size() {
        let service = WalletItemService::new(
            SpyWalletItemStore::default(),
            PaginationConfig {
                default_page_size: 25,
            },
        );

        let page = service
            .find_between_dates(1, DATE, DATE + Duration::days(5), 3)
            .unwrap();

        assert_eq!(
            *service.store().page_requests.borrow(),
            vec![PageRequest::new(3, 25)]
        );
        assert_eq!(page.page_size, 25);
    }

    #[test]
    fn find_between_dates_defaults_to_ten_per_page() {
        let service =
            WalletItemService::new(SpyWalletItemStore::default(), PaginationConfig::default());

        service.find_between_dates(1, DATE, DATE, 0).unwrap();

        assert_eq!(
            *service.store().page_requests.borrow(),
            vec![PageRequest::new(0, 10)]
        );
    }

    #[test]
    fn save_passes_store_errors_through() {
        let mut service =
            WalletItemService::new(SpyWalletItemStore::default(), PaginationConfig::default());

        let result = service.save(WalletItemBuilder::new().date(DATE));

        assert_eq!(
            result,
            Err(Error::MissingFields(vec!["wallet", "type", "value"]))
        );
    }

    #[test]
    fn find_by_wallet_and_type_delegates() {
        let mut service =
            WalletItemService::new(SpyWalletItemStore::default(), PaginationConfig::default());
        service
            .save(WalletItem::build(1, DATE, ItemType::Income, dec!(65)))
            .unwrap();
        service
            .save(WalletItem::build(1, DATE, ItemType::Expense, dec!(20)))
            .unwrap();

        let incomes = service.find_by_wallet_and_type(1, ItemType::Income).unwrap();

        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].value, dec!(65));
    }

    #[test]
    fn sum_by_wallet_id_returns_store_total() {
        let service = WalletItemService::new(
            SpyWalletItemStore {
                total: dec!(215.80),
                ..Default::default()
            },
            PaginationConfig::default(),
        );

        assert_eq!(service.sum_by_wallet_id(1), Ok(dec!(215.80)));
    }

    #[test]
    fn works_with_sqlite_store() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let connection = Arc::new(Mutex::new(conn));
        let wallet = SQLiteWalletStore::new(connection.clone())
            .create("Carteira", dec!(0))
            .unwrap();
        let mut service = WalletItemService::new(
            SQLiteWalletItemStore::new(connection),
            PaginationConfig {
                default_page_size: 2,
            },
        );
        for day in 0..3 {
            service
                .save(WalletItem::build(
                    wallet.id,
                    DATE + Duration::days(day),
                    ItemType::Income,
                    dec!(1.10),
                ))
                .unwrap();
        }

        let first_page = service
            .find_between_dates(wallet.id, DATE, DATE + Duration::days(7), 0)
            .unwrap();

        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page.total_elements, 3);
        assert_eq!(service.sum_by_wallet_id(wallet.id), Ok(dec!(3.30)));
    }
}
