//! This module defines the domain data types.

use std::str::FromStr;

use rusqlite::{Row, types::Type};
use rust_decimal::Decimal;

use crate::Error;

pub use password::{PasswordHash, ValidatedPassword};
pub use user::{NewUser, User, UserID};
pub use wallet::Wallet;
pub use wallet_item::{ItemType, WalletItem, WalletItemBuilder};

pub(crate) use wallet_item::ValidWalletItem;

mod password;
mod user;
mod wallet;
mod wallet_item;

/// Parse a decimal amount such as `"150.80"` or `"-12"`.
///
/// # Errors
/// Returns [Error::InvalidDecimal] if `text` is not a decimal number.
pub fn parse_decimal(text: &str) -> Result<Decimal, Error> {
    Decimal::from_str(text.trim()).map_err(|_| Error::InvalidDecimal(text.to_owned()))
}

/// Read a decimal stored as text from column `index`.
///
/// Amounts are stored as text rather than `REAL` so that no precision is lost.
pub(crate) fn decimal_from_row(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;

    Decimal::from_str(&raw)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

#[cfg(test)]
mod parse_decimal_tests {
    use rust_decimal_macros::dec;

    use crate::Error;

    use super::parse_decimal;

    #[test]
    fn parses_fractional_amount() {
        assert_eq!(parse_decimal("150.80"), Ok(dec!(150.80)));
    }

    #[test]
    fn parses_negative_amount_with_whitespace() {
        assert_eq!(parse_decimal(" -12 "), Ok(dec!(-12)));
    }

    #[test]
    fn rejects_text() {
        assert_eq!(
            parse_decimal("twelve"),
            Err(Error::InvalidDecimal("twelve".to_owned()))
        );
    }
}
