//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewUser, PasswordHash, User, UserID},
    stores::UserStore,
};

use super::lock;

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateEmail] if the email is taken or [Error::SqlError] if an SQL related error occurred.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let now = OffsetDateTime::now_utc();

        let user = lock(&self.connection)?
            .prepare(
                "INSERT INTO user (name, email, password, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 RETURNING id, name, email, password, created_at, updated_at",
            )?
            .query_row(
                (
                    &new_user.name,
                    new_user.email.as_str(),
                    new_user.password_hash.as_ref(),
                    now,
                ),
                Self::map_row,
            )?;

        tracing::debug!("created user {}", user.id);

        Ok(user)
    }

    /// Update the name, email and password of the user with the ID of `user`.
    ///
    /// # Errors
    ///
    /// Returns [Error::UpdateMissingUser] if the user does not exist, [Error::DuplicateEmail] if
    /// the new email belongs to another user, or [Error::SqlError] if an SQL related error occurred.
    fn update(&mut self, user: &User) -> Result<User, Error> {
        lock(&self.connection)?
            .prepare(
                "UPDATE user SET name = ?1, email = ?2, password = ?3, updated_at = ?4
                 WHERE id = ?5
                 RETURNING id, name, email, password, created_at, updated_at",
            )?
            .query_row(
                (
                    &user.name,
                    user.email.as_str(),
                    user.password_hash.as_ref(),
                    OffsetDateTime::now_utc(),
                    user.id.as_i64(),
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingUser,
                error => error.into(),
            })
    }

    fn get(&self, id: UserID) -> Result<Option<User>, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT id, name, email, password, created_at, updated_at FROM user WHERE id = :id",
            )?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    /// Get the user from the database that has the specified `email` address, or `None` if
    /// no user has that email.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if an SQL related error occurred.
    fn get_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        lock(&self.connection)?
            .prepare(
                "SELECT id, name, email, password, created_at, updated_at FROM user
                 WHERE email = :email",
            )?
            .query_row(&[(":email", email.as_str())], Self::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    fn delete_all(&mut self) -> Result<(), Error> {
        let deleted = lock(&self.connection)?.execute("DELETE FROM user", ())?;

        tracing::debug!("deleted {deleted} user(s)");

        Ok(())
    }

    fn count(&self) -> Result<u64, Error> {
        let count: i64 =
            lock(&self.connection)?.query_row("SELECT COUNT(id) FROM user", [], |row| row.get(0))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_email: String = row.get(offset + 2)?;
        let raw_password_hash: String = row.get(offset + 3)?;

        Ok(User {
            id: UserID::new(row.get(offset)?),
            name: row.get(offset + 1)?,
            email: EmailAddress::new_unchecked(raw_email),
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            created_at: row.get(offset + 4)?,
            updated_at: row.get(offset + 5)?,
        })
    }
}

#[cfg(test)]
mod user_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{NewUser, PasswordHash, UserID},
    };

    use super::{SQLiteUserStore, UserStore};

    const EMAIL: &str = "email@teste.com";

    fn get_store() -> SQLiteUserStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(conn)))
    }

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_owned(),
            email: EmailAddress::from_str(email).unwrap(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        }
    }

    /// A store with one user registered under [EMAIL].
    fn get_seeded_store() -> SQLiteUserStore {
        let mut store = get_store();
        store.create(new_user("Set up User", EMAIL)).unwrap();
        store
    }

    #[test]
    fn create_user_succeeds() {
        let mut store = get_store();

        let user = store.create(new_user("Teste", "teste@teste.com")).unwrap();

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.name, "Teste");
        assert_eq!(user.email.as_str(), "teste@teste.com");
        assert_eq!(user.password_hash, PasswordHash::new_unchecked("hunter2"));
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn create_user_fails_on_duplicate_email() {
        let mut store = get_seeded_store();

        let result = store.create(new_user("Someone Else", EMAIL));

        assert_eq!(result, Err(Error::DuplicateEmail));
        assert!(result.unwrap_err().is_constraint_violation());
    }

    #[test]
    fn get_by_email_finds_seeded_user() {
        let store = get_seeded_store();

        let user = store
            .get_by_email(&EmailAddress::from_str(EMAIL).unwrap())
            .unwrap();

        match user {
            Some(user) => assert_eq!(user.email.as_str(), EMAIL),
            None => panic!("Want user with email {EMAIL}, got None"),
        }
    }

    #[test]
    fn get_by_email_returns_none_for_unknown_email() {
        let store = get_seeded_store();

        let user = store
            .get_by_email(&EmailAddress::from_str("nobody@teste.com").unwrap())
            .unwrap();

        assert_eq!(user, None);
    }

    #[test]
    fn get_returns_created_user() {
        let mut store = get_store();
        let user = store.create(new_user("Teste", "teste@teste.com")).unwrap();

        assert_eq!(store.get(user.id), Ok(Some(user)));
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let store = get_store();

        assert_eq!(store.get(UserID::new(42)), Ok(None));
    }

    #[test]
    fn update_changes_name_and_email() {
        let mut store = get_seeded_store();
        let mut user = store
            .get_by_email(&EmailAddress::from_str(EMAIL).unwrap())
            .unwrap()
            .unwrap();
        user.name = "Renamed".to_owned();
        user.email = EmailAddress::from_str("renamed@teste.com").unwrap();

        let updated = store.update(&user).unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(store.get(user.id).unwrap(), Some(updated));
        assert_eq!(
            store.get_by_email(&EmailAddress::from_str(EMAIL).unwrap()),
            Ok(None)
        );
    }

    #[test]
    fn update_fails_for_unknown_user() {
        let mut store = get_seeded_store();
        let mut user = store
            .get_by_email(&EmailAddress::from_str(EMAIL).unwrap())
            .unwrap()
            .unwrap();
        user.id = UserID::new(user.id.as_i64() + 100);

        assert_eq!(store.update(&user), Err(Error::UpdateMissingUser));
    }

    #[test]
    fn delete_all_removes_users() {
        let mut store = get_seeded_store();
        store.create(new_user("Teste", "teste@teste.com")).unwrap();
        assert_eq!(store.count(), Ok(2));

        store.delete_all().unwrap();

        assert_eq!(store.count(), Ok(0));
    }
}
