//! Defines the wallet store trait.

use rust_decimal::Decimal;

use crate::{
    Error, WalletId,
    models::{UserID, Wallet},
};

/// Creates, retrieves and deletes wallets, and records which users may access them.
pub trait WalletStore {
    /// Create a new wallet with a starting `value`.
    fn create(&mut self, name: &str, value: Decimal) -> Result<Wallet, Error>;

    /// Overwrite the name and value of an existing wallet.
    ///
    /// Returns [Error::UpdateMissingWallet] if there is no wallet with the ID of `wallet`.
    fn update(&mut self, wallet: &Wallet) -> Result<Wallet, Error>;

    /// Get a wallet by its ID.
    fn get(&self, id: WalletId) -> Result<Option<Wallet>, Error>;

    /// Delete a wallet together with its items.
    ///
    /// Returns [Error::DeleteMissingWallet] if there is no wallet with `id`.
    fn delete(&mut self, id: WalletId) -> Result<(), Error>;

    /// Delete every wallet together with their items.
    fn delete_all(&mut self) -> Result<(), Error>;

    /// Set the value of the wallet to the sum of its items.
    ///
    /// Returns [Error::UpdateMissingWallet] if there is no wallet with `id`.
    fn reconcile_value(&mut self, id: WalletId) -> Result<Wallet, Error>;

    /// Give the user access to the wallet.
    ///
    /// Returns [Error::DuplicateUserWallet] if the user already has access.
    fn add_user(&mut self, wallet_id: WalletId, user_id: UserID) -> Result<(), Error>;

    /// Whether the user has been given access to the wallet.
    fn user_has_access(&self, wallet_id: WalletId, user_id: UserID) -> Result<bool, Error>;

    /// Get the wallets the user has access to, ordered by ID.
    fn get_for_user(&self, user_id: UserID) -> Result<Vec<Wallet>, Error>;
}
