//! Password validation and hashing.
//!
//! `ValidatedPassword` wraps a raw password that passed the strength check.
//! `PasswordHash` is the salted bcrypt hash that is stored for a user.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that is strong enough to use, but has not been hashed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with suggestions for a stronger password if
    /// the password is easy to guess.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let estimate = zxcvbn(raw_password, &[]);

        if matches!(estimate.score(), Score::Three | Score::Four) {
            return Ok(Self(raw_password.to_owned()));
        }

        Err(Error::TooWeak(
            estimate
                .feedback()
                .unwrap_or(&Feedback::default())
                .to_string(),
        ))
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// Used for seeding test databases.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "********")
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost recommended by the hashing library.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the hashing library fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Validate and hash `raw_password` in one step.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] or [Error::HashingError].
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        Self::new(ValidatedPassword::new(raw_password)?, cost)
    }

    /// Wrap a string that is already a bcrypt hash, e.g. one read from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check whether `raw_password` matches this hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, models::ValidatedPassword};

    #[test]
    fn rejects_empty_password() {
        assert!(matches!(ValidatedPassword::new(""), Err(Error::TooWeak(_))));
    }

    #[test]
    fn rejects_common_password() {
        assert!(matches!(
            ValidatedPassword::new("password123"),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn accepts_long_password() {
        assert!(ValidatedPassword::new("tr0mbone-Vortex-ledger-91").is_ok());
    }

    #[test]
    fn display_hides_password() {
        let password = ValidatedPassword::new_unchecked("senha123");

        assert_eq!(password.to_string(), "********");
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::{
        Error,
        models::{PasswordHash, ValidatedPassword},
    };

    // The minimum cost keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_does_not_contain_password() {
        let hash = PasswordHash::new(ValidatedPassword::new_unchecked("senha123"), TEST_COST)
            .unwrap();

        assert!(!hash.as_ref().contains("senha123"));
    }

    #[test]
    fn verify_accepts_original_password() {
        let hash = PasswordHash::new(ValidatedPassword::new_unchecked("senha123"), TEST_COST)
            .unwrap();

        assert!(hash.verify("senha123").unwrap());
    }

    #[test]
    fn verify_rejects_other_password() {
        let hash = PasswordHash::new(ValidatedPassword::new_unchecked("senha123"), TEST_COST)
            .unwrap();

        assert!(!hash.verify("123456").unwrap());
    }

    #[test]
    fn from_raw_password_hashes_strong_password() {
        let hash = PasswordHash::from_raw_password("tr0mbone-Vortex-ledger-91", TEST_COST)
            .expect("Strong password should be hashed");

        assert!(hash.verify("tr0mbone-Vortex-ledger-91").unwrap());
    }

    #[test]
    fn from_raw_password_rejects_weak_password() {
        let result = PasswordHash::from_raw_password("password123", TEST_COST);

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }
}
