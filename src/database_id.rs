//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a [Wallet](crate::models::Wallet).
pub type WalletId = DatabaseId;
/// The ID of a [WalletItem](crate::models::WalletItem).
pub type WalletItemId = DatabaseId;
