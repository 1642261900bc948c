//! Defines the custom category store trait.
//!
//! Only user-created categories live in the store. The fixed built-in set
//! is provided by [crate::Catalog] and merged in at the API layer.

use crate::{
    Error,
    models::{Category, CategoryUpdate, DatabaseID, NewCategory, TransactionType, UserID},
};

/// Handles the creation and retrieval of user-created categories.
pub trait CategoryStore {
    /// Create a new custom category owned by the user named in
    /// `new_category`.
    fn create(&mut self, new_category: NewCategory) -> Result<Category, Error>;

    /// Get the custom categories owned by `user_id` in insertion order,
    /// optionally restricted to one transaction type.
    fn get_by_user(
        &self,
        user_id: UserID,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Category>, Error>;

    /// Overwrite the fields supplied in `update` on the custom category `id`
    /// owned by `user_id` and return the merged category.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such category exists for this user.
    fn update(
        &mut self,
        user_id: UserID,
        id: DatabaseID,
        update: CategoryUpdate,
    ) -> Result<Category, Error>;

    /// Delete the custom category `id` owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no such category exists for this user.
    fn delete(&mut self, user_id: UserID, id: DatabaseID) -> Result<(), Error>;
}
