//! The domain models for users, transactions, and categories.

mod category;
mod currency;
mod password;
mod transaction;
mod user;

pub use category::{Category, CategoryId, CategoryUpdate, NewCategory};
pub use currency::{Currency, ParseCurrencyError};
pub use password::PasswordHash;
pub use transaction::{
    NewTransaction, ParseTransactionTypeError, Transaction, TransactionType, TransactionUpdate,
};
pub use user::{NewUser, ProfileUpdate, Settings, SettingsUpdate, User, UserData, UserID};

/// Alias for the integer type used for database row IDs.
pub type DatabaseID = i64;
