use rust_decimal::Decimal;
use serde::Serialize;

use crate::WalletId;

/// A named balance container.
///
/// `value` is not kept in sync with the wallet's items automatically, see
/// [WalletStore::reconcile_value](crate::stores::WalletStore::reconcile_value).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallet {
    /// The ID of the wallet.
    pub id: WalletId,
    /// The display name of the wallet.
    pub name: String,
    /// The balance of the wallet.
    pub value: Decimal,
}
