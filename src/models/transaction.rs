//! Defines the transaction model and the types used to create and update
//! transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{DatabaseID, UserID};

/// The error returned when a string is neither `"income"` nor `"expense"`.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0} is not a valid transaction type, expected 'income' or 'expense'")]
pub struct ParseTransactionTypeError(pub String);

/// Whether a transaction adds to or subtracts from the user's balance.
///
/// Stored amounts are always non-negative, the direction of their effect on
/// the balance comes solely from this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, added to the balance.
    Income,
    /// Money going out, subtracted from the balance.
    Expense,
}

impl TransactionType {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ParseTransactionTypeError(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense record belonging to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID generated for the transaction when it was stored.
    pub id: DatabaseID,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// Text detailing the transaction.
    pub description: String,
    /// The magnitude of the transaction. Always non-negative.
    pub amount: f64,
    /// When the transaction occurred.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// The category identifier the transaction is filed under. Free text,
    /// matched against the category catalog for display.
    pub category: String,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated data needed to store a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The ID of the user that will own the transaction.
    pub user_id: UserID,
    /// Text detailing the transaction.
    pub description: String,
    /// The magnitude of the transaction. Must be non-negative.
    pub amount: f64,
    /// When the transaction occurred.
    pub date: OffsetDateTime,
    /// The category identifier the transaction is filed under.
    pub category: String,
    /// Whether this is income or an expense.
    pub kind: TransactionType,
    /// Optional free-form notes.
    pub notes: Option<String>,
}

/// A partial update to a transaction.
///
/// Each field is independently present or absent. `notes` is doubly
/// optional: `None` leaves the stored notes untouched while `Some(None)`
/// clears them, which is how "omit" is kept distinct from "set to empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// Replacement description, if supplied.
    pub description: Option<String>,
    /// Replacement amount, if supplied. Must be non-negative.
    pub amount: Option<f64>,
    /// Replacement date, if supplied.
    pub date: Option<OffsetDateTime>,
    /// Replacement category identifier, if supplied.
    pub category: Option<String>,
    /// Replacement transaction type, if supplied.
    pub kind: Option<TransactionType>,
    /// `Some(None)` clears the notes, `Some(Some(text))` replaces them and
    /// `None` leaves them untouched.
    pub notes: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use time::macros::datetime;

    use super::{ParseTransactionTypeError, Transaction, TransactionType};
    use crate::models::UserID;

    #[test]
    fn parse_transaction_type() {
        assert_eq!(
            TransactionType::from_str("income"),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::from_str("expense"),
            Ok(TransactionType::Expense)
        );
        assert_eq!(
            TransactionType::from_str("transfer"),
            Err(ParseTransactionTypeError("transfer".to_owned()))
        );
    }

    #[test]
    fn transaction_serializes_kind_as_type() {
        let transaction = Transaction {
            id: 1,
            user_id: UserID::new(1),
            description: "weekly shop".to_owned(),
            amount: 42.5,
            date: datetime!(2024-05-01 12:00 UTC),
            category: "food".to_owned(),
            kind: TransactionType::Expense,
            notes: None,
            created_at: datetime!(2024-05-01 12:00 UTC),
        };

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["type"], "expense");
        assert_eq!(json["userId"], 1);
        assert!(json.get("kind").is_none());
    }
}
