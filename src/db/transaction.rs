//! Implements a SQLite backed transaction store.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, params_from_iter, types::Type, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{MapRow, timestamp_from_row, timestamp_to_sql},
    models::{DatabaseID, NewTransaction, Transaction, TransactionType, TransactionUpdate, UserID},
    stores::{TransactionQuery, TransactionStore},
};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, description, amount, date, category, kind, notes, created_at";

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction references its owning
/// [User](crate::models::User), the user tables must be set up in the
/// database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// Returns [Error::Sql] if there is an unexpected SQL error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let date = timestamp_to_sql(new_transaction.date)?;
        let created_at = timestamp_to_sql(OffsetDateTime::now_utc())?;
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO \"transaction\" (user_id, description, amount, date, category, kind, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    new_transaction.user_id.as_i64(),
                    &new_transaction.description,
                    new_transaction.amount,
                    date,
                    &new_transaction.category,
                    new_transaction.kind.as_str(),
                    &new_transaction.notes,
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve the transaction `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a transaction
    /// owned by this user, or [Error::Sql] if there is some other SQL error.
    fn get(&self, user_id: UserID, id: DatabaseID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
            ))?
            .query_row((id, user_id.as_i64()), Self::map_row)?;

        Ok(transaction)
    }

    /// Query for the user's transactions in the database.
    ///
    /// # Errors
    /// Returns [Error::Sql] if there is a SQL error.
    fn get_query(
        &self,
        user_id: UserID,
        query: TransactionQuery,
    ) -> Result<Vec<Transaction>, Error> {
        let mut sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = ?1"
        );
        let mut params: Vec<Value> = vec![Value::from(user_id.as_i64())];

        if let Some(kind) = query.kind {
            params.push(Value::from(kind.as_str().to_owned()));
            sql.push_str(&format!(" AND kind = ?{}", params.len()));
        }

        if let Some(cutoff) = query.cutoff {
            params.push(Value::from(timestamp_to_sql(cutoff)?));
            sql.push_str(&format!(" AND date >= ?{}", params.len()));
        }

        sql.push_str(" ORDER BY date DESC");

        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let transactions = connection
            .prepare(&sql)?
            .query_map(params_from_iter(params), Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Overwrite the supplied fields on the transaction `id` owned by
    /// `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a transaction
    /// owned by this user, or [Error::Sql] if there is some other SQL error.
    fn update(
        &mut self,
        user_id: UserID,
        id: DatabaseID,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let stored = connection
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
            ))?
            .query_row((id, user_id.as_i64()), Self::map_row)?;

        let merged = Transaction {
            description: update.description.unwrap_or(stored.description),
            amount: update.amount.unwrap_or(stored.amount),
            date: update.date.unwrap_or(stored.date),
            category: update.category.unwrap_or(stored.category),
            kind: update.kind.unwrap_or(stored.kind),
            // `None` means the notes were omitted from the update, while
            // `Some(None)` clears them.
            notes: match update.notes {
                Some(notes) => notes,
                None => stored.notes,
            },
            ..stored
        };

        connection.execute(
            "UPDATE \"transaction\"
             SET description = ?1, amount = ?2, date = ?3, category = ?4, kind = ?5, notes = ?6
             WHERE id = ?7 AND user_id = ?8",
            (
                &merged.description,
                merged.amount,
                timestamp_to_sql(merged.date)?,
                &merged.category,
                merged.kind.as_str(),
                &merged.notes,
                id,
                user_id.as_i64(),
            ),
        )?;

        Ok(merged)
    }

    /// Delete the transaction `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a transaction
    /// owned by this user, or [Error::Sql] if there is some other SQL error.
    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error> {
        let affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
                (id, user_id.as_i64()),
            )?;

        if affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Delete all transactions owned by `user_id` with a single bulk delete.
    ///
    /// Deleting zero records succeeds with a count of zero.
    fn delete_all(&mut self, user_id: UserID) -> Result<u64, Error> {
        let affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "DELETE FROM \"transaction\" WHERE user_id = ?1",
                (user_id.as_i64(),),
            )?;

        Ok(affected as u64)
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
        let kind_text: String = row.get(6)?;
        let kind = TransactionType::from_str(&kind_text)
            .map_err(|error| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(error)))?;

        Ok(Transaction {
            id: row.get(0)?,
            user_id: UserID::new(row.get(1)?),
            description: row.get(2)?,
            amount: row.get(3)?,
            date: timestamp_from_row(row, 4)?,
            category: row.get(5)?,
            kind,
            notes: row.get(7)?,
            created_at: timestamp_from_row(row, 8)?,
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
    use time::{Duration, OffsetDateTime, macros::datetime};

    use super::SQLiteTransactionStore;
    use crate::{
        Error,
        db::{SQLiteUserStore, test_support::test_connection},
        models::{
            NewTransaction, NewUser, PasswordHash, Transaction, TransactionType, TransactionUpdate,
            UserID,
        },
        stores::{TransactionQuery, TransactionStore, UserStore},
    };

    fn test_stores() -> (SQLiteTransactionStore, SQLiteUserStore) {
        let connection = Arc::new(Mutex::new(test_connection()));

        (
            SQLiteTransactionStore::new(connection.clone()),
            SQLiteUserStore::new(connection),
        )
    }

    fn create_user(store: &mut SQLiteUserStore, email: &str) -> UserID {
        store
            .create(NewUser {
                name: "Ashley".to_owned(),
                email: EmailAddress::from_str(email).unwrap(),
                password_hash: PasswordHash::new("hunter2", 4).unwrap(),
            })
            .unwrap()
            .id
    }

    fn new_transaction(user_id: UserID, date: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            user_id,
            description: "weekly shop".to_owned(),
            amount: 42.5,
            date,
            category: "food".to_owned(),
            kind: TransactionType::Expense,
            notes: Some("market day".to_owned()),
        }
    }

    fn create_transaction(
        store: &mut SQLiteTransactionStore,
        user_id: UserID,
        date: OffsetDateTime,
    ) -> Transaction {
        store.create(new_transaction(user_id, date)).unwrap()
    }

    #[test]
    fn create_and_get_round_trips_every_field() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");
        let date = datetime!(2024-05-01 12:00 UTC);

        let created = store.create(new_transaction(user_id, date)).unwrap();

        assert_eq!(created.user_id, user_id);
        assert_eq!(created.description, "weekly shop");
        assert_eq!(created.amount, 42.5);
        assert_eq!(created.date, date);
        assert_eq!(created.category, "food");
        assert_eq!(created.kind, TransactionType::Expense);
        assert_eq!(created.notes, Some("market day".to_owned()));

        assert_eq!(store.get(user_id, created.id).unwrap(), created);
    }

    #[test]
    fn create_preserves_fractional_seconds() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");
        let date = datetime!(2024-05-01 12:00:00.123 UTC);

        let created = store.create(new_transaction(user_id, date)).unwrap();

        assert_eq!(created.date, date);
        assert_eq!(store.get(user_id, created.id).unwrap().date, date);
    }

    #[test]
    fn get_with_wrong_owner_fails() {
        let (mut store, mut user_store) = test_stores();
        let owner = create_user(&mut user_store, "ashley@example.com");
        let other = create_user(&mut user_store, "sam@example.com");

        let created = create_transaction(&mut store, owner, datetime!(2024-05-01 12:00 UTC));

        assert_eq!(store.get(other, created.id), Err(Error::NotFound));
    }

    #[test]
    fn query_orders_by_date_descending() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");

        let oldest = create_transaction(&mut store, user_id, datetime!(2024-01-01 00:00 UTC));
        let newest = create_transaction(&mut store, user_id, datetime!(2024-03-01 00:00 UTC));
        let middle = create_transaction(&mut store, user_id, datetime!(2024-02-01 00:00 UTC));

        let transactions = store
            .get_query(user_id, TransactionQuery::default())
            .unwrap();

        assert_eq!(transactions, vec![newest, middle, oldest]);
    }

    #[test]
    fn query_filters_by_kind_and_cutoff() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");

        let recent_expense =
            create_transaction(&mut store, user_id, datetime!(2024-03-01 00:00 UTC));
        create_transaction(&mut store, user_id, datetime!(2024-01-01 00:00 UTC));
        store
            .create(NewTransaction {
                kind: TransactionType::Income,
                ..new_transaction(user_id, datetime!(2024-03-02 00:00 UTC))
            })
            .unwrap();

        let transactions = store
            .get_query(
                user_id,
                TransactionQuery {
                    kind: Some(TransactionType::Expense),
                    cutoff: Some(datetime!(2024-02-01 00:00 UTC)),
                },
            )
            .unwrap();

        assert_eq!(transactions, vec![recent_expense]);
    }

    #[test]
    fn cutoff_is_inclusive() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");
        let date = datetime!(2024-02-01 00:00 UTC);

        let transaction = create_transaction(&mut store, user_id, date);

        let transactions = store
            .get_query(
                user_id,
                TransactionQuery {
                    kind: None,
                    cutoff: Some(date),
                },
            )
            .unwrap();

        assert_eq!(transactions, vec![transaction]);
    }

    #[test]
    fn query_returns_empty_vec_when_nothing_matches() {
        let (store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");

        let transactions = store
            .get_query(user_id, TransactionQuery::default())
            .unwrap();

        assert_eq!(transactions, vec![]);
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");
        let created = create_transaction(&mut store, user_id, datetime!(2024-05-01 12:00 UTC));

        let updated = store
            .update(
                user_id,
                created.id,
                TransactionUpdate {
                    amount: Some(50.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.kind, created.kind);
        assert_eq!(updated.notes, created.notes);
        assert_eq!(store.get(user_id, created.id).unwrap(), updated);
    }

    #[test]
    fn update_distinguishes_clearing_notes_from_omitting_them() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");
        let created = create_transaction(&mut store, user_id, datetime!(2024-05-01 12:00 UTC));

        // Omitted notes are left untouched.
        let updated = store
            .update(
                user_id,
                created.id,
                TransactionUpdate {
                    amount: Some(50.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.notes, created.notes);

        // An explicit null clears them.
        let updated = store
            .update(
                user_id,
                created.id,
                TransactionUpdate {
                    notes: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.notes, None);
    }

    #[test]
    fn update_with_wrong_owner_fails_and_leaves_record_unchanged() {
        let (mut store, mut user_store) = test_stores();
        let owner = create_user(&mut user_store, "ashley@example.com");
        let other = create_user(&mut user_store, "sam@example.com");
        let created = create_transaction(&mut store, owner, datetime!(2024-05-01 12:00 UTC));

        let result = store.update(
            other,
            created.id,
            TransactionUpdate {
                amount: Some(9_999.0),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(Error::NotFound));
        assert_eq!(store.get(owner, created.id).unwrap(), created);
    }

    #[test]
    fn delete_with_wrong_owner_fails() {
        let (mut store, mut user_store) = test_stores();
        let owner = create_user(&mut user_store, "ashley@example.com");
        let other = create_user(&mut user_store, "sam@example.com");
        let created = create_transaction(&mut store, owner, datetime!(2024-05-01 12:00 UTC));

        assert_eq!(store.delete(other, created.id), Err(Error::NotFound));
        assert!(store.get(owner, created.id).is_ok());
    }

    #[test]
    fn delete_removes_record() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");
        let created = create_transaction(&mut store, user_id, datetime!(2024-05-01 12:00 UTC));

        store.delete(user_id, created.id).unwrap();

        assert_eq!(store.get(user_id, created.id), Err(Error::NotFound));
        assert_eq!(store.delete(user_id, created.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_all_is_idempotent_and_scoped_to_user() {
        let (mut store, mut user_store) = test_stores();
        let user_id = create_user(&mut user_store, "ashley@example.com");
        let other = create_user(&mut user_store, "sam@example.com");

        let now = OffsetDateTime::now_utc();
        create_transaction(&mut store, user_id, now);
        create_transaction(&mut store, user_id, now - Duration::days(1));
        let unrelated = create_transaction(&mut store, other, now);

        assert_eq!(store.delete_all(user_id).unwrap(), 2);
        assert_eq!(store.delete_all(user_id).unwrap(), 0);
        assert_eq!(
            store.get_query(user_id, TransactionQuery::default()).unwrap(),
            vec![]
        );
        // The other user's data is untouched.
        assert_eq!(store.get(other, unrelated.id).unwrap(), unrelated);
    }
}
