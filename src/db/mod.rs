//! SQLite-backed implementations of the store traits, plus the schema
//! initialization for the application database.

mod category;
mod transaction;
mod user;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{AppState, AuthConfig, Catalog, Error};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SqlAppState = AppState<SQLiteCategoryStore, SQLiteTransactionStore, SQLiteUserStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the
/// domain models.
///
/// # Errors
/// Returns an error if the database schema cannot be created.
pub fn create_app_state(
    db_connection: Connection,
    auth: AuthConfig,
    catalog: Catalog,
) -> Result<SqlAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        auth,
        catalog,
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
    ))
}

/// Create the tables for the domain models if they do not exist yet.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL
/// error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            currency TEXT NOT NULL DEFAULT 'INR',
            dark_mode INTEGER NOT NULL DEFAULT 0,
            monthly_budget REAL NOT NULL DEFAULT 10000 CHECK (monthly_budget >= 0),
            photo TEXT,
            refresh_token TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id),
            description TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            date INTEGER NOT NULL,
            category TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            notes TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id),
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense'))
        );",
    )?;

    Ok(())
}

/// A trait for mapping a `rusqlite::Row` from the database to a concrete
/// rust type.
pub(crate) trait MapRow {
    /// The type produced from a row.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects the row to contain all the table
    /// columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// The value stored in timestamp columns for `date`: the unix timestamp in
/// nanoseconds.
///
/// Nanosecond precision keeps sub-second input intact, so a stored date
/// reads back exactly as it was submitted. An i64 of nanoseconds covers the
/// years 1677 through 2262; dates outside that range are rejected rather
/// than wrapped.
pub(crate) fn timestamp_to_sql(date: OffsetDateTime) -> Result<i64, Error> {
    i64::try_from(date.unix_timestamp_nanos())
        .map_err(|_| Error::Validation("date is outside the supported range".to_owned()))
}

/// Read the nanosecond unix timestamp stored in column `index` as an
/// [OffsetDateTime].
pub(crate) fn timestamp_from_row(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let nanoseconds: i64 = row.get(index)?;

    OffsetDateTime::from_unix_timestamp_nanos(nanoseconds as i128)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error)))
}
