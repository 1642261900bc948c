//! Implements a SQLite backed store for user-created categories.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, params_from_iter, types::Type, types::Value};

use crate::{
    Error,
    db::MapRow,
    models::{Category, CategoryId, CategoryUpdate, DatabaseID, NewCategory, TransactionType, UserID},
    stores::CategoryStore,
};

const CATEGORY_COLUMNS: &str = "id, user_id, name, icon, kind";

/// Stores custom categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a new custom category in the database.
    ///
    /// # Errors
    /// Returns [Error::Sql] if there is an unexpected SQL error.
    fn create(&mut self, new_category: NewCategory) -> Result<Category, Error> {
        let category = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&format!(
                "INSERT INTO category (user_id, name, icon, kind)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {CATEGORY_COLUMNS}"
            ))?
            .query_row(
                (
                    new_category.user_id.as_i64(),
                    &new_category.name,
                    &new_category.icon,
                    new_category.kind.as_str(),
                ),
                Self::map_row,
            )?;

        Ok(category)
    }

    /// Get the user's custom categories in insertion order.
    ///
    /// # Errors
    /// Returns [Error::Sql] if there is a SQL error.
    fn get_by_user(
        &self,
        user_id: UserID,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, Error> {
        let mut sql = format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE user_id = ?1");
        let mut params: Vec<Value> = vec![Value::from(user_id.as_i64())];

        if let Some(kind) = kind {
            params.push(Value::from(kind.as_str().to_owned()));
            sql.push_str(&format!(" AND kind = ?{}", params.len()));
        }

        sql.push_str(" ORDER BY id ASC");

        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let categories = connection
            .prepare(&sql)?
            .query_map(params_from_iter(params), Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Overwrite the supplied fields on the custom category `id` owned by
    /// `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a custom category
    /// owned by this user, or [Error::Sql] if there is some other SQL error.
    fn update(
        &mut self,
        user_id: UserID,
        id: DatabaseID,
        update: CategoryUpdate,
    ) -> Result<Category, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let mut category = connection
            .prepare(&format!(
                "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = ?1 AND user_id = ?2"
            ))?
            .query_row((id, user_id.as_i64()), Self::map_row)?;

        if let Some(name) = update.name {
            category.name = name;
        }

        if let Some(icon) = update.icon {
            category.icon = icon;
        }

        connection.execute(
            "UPDATE category SET name = ?1, icon = ?2 WHERE id = ?3 AND user_id = ?4",
            (&category.name, &category.icon, id, user_id.as_i64()),
        )?;

        Ok(category)
    }

    /// Delete the custom category `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a custom category
    /// owned by this user, or [Error::Sql] if there is some other SQL error.
    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error> {
        let affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
                (id, user_id.as_i64()),
            )?;

        if affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
        let kind_text: String = row.get(4)?;
        let kind = TransactionType::from_str(&kind_text)
            .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;

        Ok(Category {
            id: CategoryId::Custom(row.get(0)?),
            user_id: Some(UserID::new(row.get(1)?)),
            name: row.get(2)?,
            icon: row.get(3)?,
            kind,
        })
    }
}
