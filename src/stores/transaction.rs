//! Defines the transaction store trait.

use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, NewTransaction, Transaction, TransactionType, TransactionUpdate, UserID},
};

/// Defines which of a user's transactions [TransactionStore::get_query]
/// should fetch.
///
/// Results are always ordered by date, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Restrict results to one transaction type. `None` places no
    /// restriction.
    pub kind: Option<TransactionType>,
    /// Include only transactions dated at or after this timestamp. `None`
    /// includes all history.
    pub cutoff: Option<OffsetDateTime>,
}

/// Handles the creation, retrieval, and removal of transactions.
///
/// Every operation is scoped to a single owning user: a transaction that
/// exists but belongs to someone else is indistinguishable from one that
/// does not exist.
pub trait TransactionStore {
    /// Create a new transaction in the store and return the stored
    /// representation, including its generated ID and creation timestamp.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve the transaction `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such transaction exists for this user.
    fn get(&self, user_id: UserID, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve the transactions owned by `user_id` that match `query`,
    /// ordered by date descending. Returns an empty vector when nothing
    /// matches.
    fn get_query(&self, user_id: UserID, query: TransactionQuery)
    -> Result<Vec<Transaction>, Error>;

    /// Overwrite the fields supplied in `update` on the transaction `id`
    /// owned by `user_id`, leaving the rest untouched, and return the merged
    /// record.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such transaction exists for this user.
    fn update(
        &mut self,
        user_id: UserID,
        id: DatabaseID,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such transaction exists for this user.
    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error>;

    /// Delete all transactions owned by `user_id` in one bulk operation and
    /// return the number of records removed. Deleting zero records is not an
    /// error.
    fn delete_all(&mut self, user_id: UserID) -> Result<u64, Error>;
}
