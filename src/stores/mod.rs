//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod user;
mod wallet;
mod wallet_item;

pub mod sqlite;

pub use user::UserStore;
pub use wallet::WalletStore;
pub use wallet_item::WalletItemStore;
