//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, User, UserID},
};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Register a new user.
    ///
    /// Returns [Error::DuplicateEmail] if the email is already in use.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Overwrite the name, email and password hash of an existing user.
    ///
    /// Returns [Error::UpdateMissingUser] if there is no user with the ID of `user`.
    fn update(&mut self, user: &User) -> Result<User, Error>;

    /// Get a user by their ID.
    fn get(&self, id: UserID) -> Result<Option<User>, Error>;

    /// Get a user by their email, or `None` if no user has that email.
    fn get_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error>;

    /// Remove every user.
    fn delete_all(&mut self) -> Result<(), Error>;

    /// The number of registered users.
    fn count(&self) -> Result<u64, Error>;
}
