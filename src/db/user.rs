//! Implements a SQLite backed user store.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{MapRow, timestamp_from_row, timestamp_to_sql},
    models::{Currency, NewUser, PasswordHash, ProfileUpdate, SettingsUpdate, User, UserID},
    stores::UserStore,
};

const USER_COLUMNS: &str =
    "id, name, email, password, currency, dark_mode, monthly_budget, photo, refresh_token, created_at";

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create a new user in the database.
    ///
    /// New users get the default settings: base currency, light mode, and
    /// the standard monthly budget.
    ///
    /// # Errors
    /// Returns [Error::DuplicateEmail] if the email address is already
    /// registered, or [Error::Sql] if there is some other SQL error.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let created_at = timestamp_to_sql(OffsetDateTime::now_utc())?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let user = connection
            .prepare(&format!(
                "INSERT INTO user (name, email, password, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {USER_COLUMNS}"
            ))?
            .query_row(
                (
                    &new_user.name,
                    new_user.email.to_string(),
                    new_user.password_hash.as_str(),
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(user)
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?1"))?
            .query_row((id.as_i64(),), Self::map_row)?;

        Ok(user)
    }

    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = ?1"))?
            .query_row((email.to_string(),), Self::map_row)?;

        Ok(user)
    }

    fn update_profile(&mut self, id: UserID, update: ProfileUpdate) -> Result<User, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let mut user = connection
            .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?1"))?
            .query_row((id.as_i64(),), Self::map_row)?;

        if let Some(name) = update.name {
            user.name = name;
        }

        if let Some(email) = update.email {
            user.email = email;
        }

        connection.execute(
            "UPDATE user SET name = ?1, email = ?2 WHERE id = ?3",
            (&user.name, user.email.to_string(), id.as_i64()),
        )?;

        Ok(user)
    }

    fn update_settings(&mut self, id: UserID, update: SettingsUpdate) -> Result<User, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let mut user = connection
            .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?1"))?
            .query_row((id.as_i64(),), Self::map_row)?;

        if let Some(dark_mode) = update.dark_mode {
            user.dark_mode = dark_mode;
        }

        if let Some(currency) = update.currency {
            user.currency = currency;
        }

        if let Some(monthly_budget) = update.monthly_budget {
            user.monthly_budget = monthly_budget;
        }

        connection.execute(
            "UPDATE user SET currency = ?1, dark_mode = ?2, monthly_budget = ?3 WHERE id = ?4",
            (
                user.currency.as_str(),
                user.dark_mode,
                user.monthly_budget,
                id.as_i64(),
            ),
        )?;

        Ok(user)
    }

    fn set_refresh_token(&mut self, id: UserID, refresh_token: Option<&str>) -> Result<(), Error> {
        let affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE user SET refresh_token = ?1 WHERE id = ?2",
                (refresh_token, id.as_i64()),
            )?;

        if affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
        let email_text: String = row.get(2)?;
        let email = EmailAddress::from_str(&email_text)
            .map_err(|error| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(error)))?;

        let currency_text: String = row.get(4)?;
        let currency = Currency::from_str(&currency_text)
            .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;

        Ok(User {
            id: UserID::new(row.get(0)?),
            name: row.get(1)?,
            email,
            password_hash: PasswordHash::from_hash(row.get(3)?),
            currency,
            dark_mode: row.get(5)?,
            monthly_budget: row.get(6)?,
            photo: row.get(7)?,
            refresh_token: row.get(8)?,
            created_at: timestamp_from_row(row, 9)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;

    use super::SQLiteUserStore;
    use crate::{
        Error,
        db::test_support::test_connection,
        models::{Currency, NewUser, PasswordHash, ProfileUpdate, SettingsUpdate},
        stores::UserStore,
    };

    fn test_store() -> SQLiteUserStore {
        SQLiteUserStore::new(Arc::new(Mutex::new(test_connection())))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ashley".to_owned(),
            email: EmailAddress::from_str(email).unwrap(),
            password_hash: PasswordHash::new("hunter2", 4).unwrap(),
        }
    }

    #[test]
    fn create_user_applies_default_settings() {
        let mut store = test_store();

        let user = store.create(new_user("ashley@example.com")).unwrap();

        assert_eq!(user.currency, Currency::BASE);
        assert!(!user.dark_mode);
        assert_eq!(user.monthly_budget, 10_000.0);
        assert_eq!(user.photo, None);
        assert_eq!(user.refresh_token, None);
    }

    #[test]
    fn create_user_with_duplicate_email_fails() {
        let mut store = test_store();

        let first = store.create(new_user("ashley@example.com")).unwrap();
        let result = store.create(new_user("ashley@example.com"));

        assert_eq!(result, Err(Error::DuplicateEmail));
        // The first registration is unaffected.
        assert_eq!(store.get(first.id).unwrap(), first);
    }

    #[test]
    fn get_by_email_round_trips() {
        let mut store = test_store();

        let created = store.create(new_user("ashley@example.com")).unwrap();
        let fetched = store
            .get_by_email(&EmailAddress::from_str("ashley@example.com").unwrap())
            .unwrap();

        assert_eq!(created, fetched);
    }

    #[test]
    fn get_missing_user_fails() {
        let store = test_store();

        assert_eq!(
            store.get(crate::models::UserID::new(999)),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_settings_changes_only_supplied_fields() {
        let mut store = test_store();
        let user = store.create(new_user("ashley@example.com")).unwrap();

        let updated = store
            .update_settings(
                user.id,
                SettingsUpdate {
                    currency: Some(Currency::GBP),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.currency, Currency::GBP);
        assert_eq!(updated.dark_mode, user.dark_mode);
        assert_eq!(updated.monthly_budget, user.monthly_budget);
        assert_eq!(store.get(user.id).unwrap(), updated);
    }

    #[test]
    fn update_profile_changes_email() {
        let mut store = test_store();
        let user = store.create(new_user("ashley@example.com")).unwrap();

        let updated = store
            .update_profile(
                user.id,
                ProfileUpdate {
                    email: Some(EmailAddress::from_str("new@example.com").unwrap()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.email.as_str(), "new@example.com");
        assert_eq!(updated.name, user.name);
    }

    #[test]
    fn set_refresh_token_persists() {
        let mut store = test_store();
        let user = store.create(new_user("ashley@example.com")).unwrap();

        store.set_refresh_token(user.id, Some("a token")).unwrap();
        assert_eq!(
            store.get(user.id).unwrap().refresh_token,
            Some("a token".to_owned())
        );

        store.set_refresh_token(user.id, None).unwrap();
        assert_eq!(store.get(user.id).unwrap().refresh_token, None);
    }
}
