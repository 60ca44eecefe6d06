//! Defines the wallet item, a single dated ledger entry of a wallet.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, WalletId, WalletItemId};

/// Whether a wallet item is money coming in or going out.
///
/// The item type is stored as a two letter code: `EN` (entrada) for income
/// and `SD` (saída) for expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Money earned.
    #[serde(rename = "EN")]
    Income,
    /// Money spent.
    #[serde(rename = "SD")]
    Expense,
}

impl ItemType {
    /// The code used to store the item type.
    pub fn code(&self) -> &'static str {
        match self {
            ItemType::Income => "EN",
            ItemType::Expense => "SD",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ItemType {
    type Err = Error;

    /// Parse either the stored code (`EN`, `SD`) or the English name
    /// (`income`, `expense`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "income" => Ok(ItemType::Income),
            "sd" | "expense" => Ok(ItemType::Expense),
            _ => Err(Error::InvalidItemType(s.to_owned())),
        }
    }
}

impl ToSql for ItemType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for ItemType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "EN" => Ok(ItemType::Income),
            "SD" => Ok(ItemType::Expense),
            other => Err(FromSqlError::Other(Box::new(Error::InvalidItemType(
                other.to_owned(),
            )))),
        }
    }
}

/// An income or expense recorded against a wallet.
///
/// To create a new `WalletItem`, use [WalletItem::build] and save the builder
/// with a [WalletItemStore](crate::stores::WalletItemStore).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletItem {
    /// The ID of the wallet item.
    pub id: WalletItemId,
    /// The wallet the item belongs to.
    pub wallet_id: WalletId,
    /// When the money moved.
    pub date: Date,
    /// Whether the item is income or an expense.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// What the money was for. May be empty.
    pub description: String,
    /// The amount of money.
    pub value: Decimal,
}

impl WalletItem {
    /// Start building a new wallet item with all of its required fields.
    ///
    /// Shortcut for [WalletItemBuilder] for discoverability.
    pub fn build(
        wallet_id: WalletId,
        date: Date,
        item_type: ItemType,
        value: Decimal,
    ) -> WalletItemBuilder {
        WalletItemBuilder::new()
            .wallet_id(wallet_id)
            .date(date)
            .item_type(item_type)
            .value(value)
    }
}

/// A builder for saving [WalletItem] instances.
///
/// Every field is optional so that a builder can describe incomplete input.
/// Saving a builder without a wallet, date, type or value is rejected with
/// [Error::MissingFields].
///
/// A builder without an ID creates a new item when saved. A builder with an
/// ID, e.g. one made from an existing item with [From], updates that item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletItemBuilder {
    /// The ID of an existing item to update.
    pub id: Option<WalletItemId>,
    /// The wallet the item belongs to.
    pub wallet_id: Option<WalletId>,
    /// When the money moved.
    pub date: Option<Date>,
    /// Whether the item is income or an expense.
    pub item_type: Option<ItemType>,
    /// What the money was for.
    pub description: String,
    /// The amount of money.
    pub value: Option<Decimal>,
}

impl WalletItemBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wallet the item belongs to.
    pub fn wallet_id(mut self, wallet_id: WalletId) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    /// Set the date of the item.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the type of the item.
    pub fn item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    /// Set the description of the item.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the value of the item.
    pub fn value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    /// Check that the required fields are present.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] naming every missing field.
    pub(crate) fn validate(self) -> Result<ValidWalletItem, Error> {
        match (self.wallet_id, self.date, self.item_type, self.value) {
            (Some(wallet_id), Some(date), Some(item_type), Some(value)) => Ok(ValidWalletItem {
                id: self.id,
                wallet_id,
                date,
                item_type,
                description: self.description,
                value,
            }),
            (wallet_id, date, item_type, value) => {
                let missing = [
                    ("wallet", wallet_id.is_none()),
                    ("date", date.is_none()),
                    ("type", item_type.is_none()),
                    ("value", value.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();

                Err(Error::MissingFields(missing))
            }
        }
    }
}

impl From<WalletItem> for WalletItemBuilder {
    fn from(item: WalletItem) -> Self {
        Self {
            id: Some(item.id),
            wallet_id: Some(item.wallet_id),
            date: Some(item.date),
            item_type: Some(item.item_type),
            description: item.description,
            value: Some(item.value),
        }
    }
}

/// A wallet item whose required fields have been checked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidWalletItem {
    pub id: Option<WalletItemId>,
    pub wallet_id: WalletId,
    pub date: Date,
    pub item_type: ItemType,
    pub description: String,
    pub value: Decimal,
}

#[cfg(test)]
mod item_type_tests {
    use std::str::FromStr;

    use crate::Error;

    use super::ItemType;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!(ItemType::from_str("EN"), Ok(ItemType::Income));
        assert_eq!(ItemType::from_str("sd"), Ok(ItemType::Expense));
        assert_eq!(ItemType::from_str("Income"), Ok(ItemType::Income));
        assert_eq!(ItemType::from_str("expense"), Ok(ItemType::Expense));
    }

    #[test]
    fn rejects_unknown_code() {
        assert_eq!(
            ItemType::from_str("XX"),
            Err(Error::InvalidItemType("XX".to_owned()))
        );
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&ItemType::Expense).unwrap(), "\"SD\"");
    }
}
