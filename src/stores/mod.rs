//! The persistence seam: traits describing how users, transactions, and
//! categories are stored. The SQLite implementations live in [crate::db].

mod category;
mod transaction;
mod user;

pub use category::CategoryStore;
pub use transaction::{TransactionQuery, TransactionStore};
pub use user::UserStore;
