//! Defines the category model shared by the built-in catalog and
//! user-created custom categories.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{DatabaseID, TransactionType, UserID};

/// The prefix that namespaces custom category IDs away from built-in ones.
const CUSTOM_ID_PREFIX: &str = "custom-";

/// Identifies a category in the merged namespace of built-in and custom
/// categories.
///
/// Built-in IDs are short words such as `food`. Custom IDs are the database
/// row ID rendered as `custom-{n}`, so a custom category can never shadow a
/// built-in one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryId {
    /// The identifier of a fixed, built-in category.
    Builtin(String),
    /// The database row ID of a user-created category.
    Custom(DatabaseID),
}

impl FromStr for CategoryId {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text
            .strip_prefix(CUSTOM_ID_PREFIX)
            .and_then(|suffix| suffix.parse::<DatabaseID>().ok())
        {
            Some(id) => Ok(CategoryId::Custom(id)),
            None => Ok(CategoryId::Builtin(text.to_owned())),
        }
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryId::Builtin(id) => write!(f, "{id}"),
            CategoryId::Custom(id) => write!(f, "{CUSTOM_ID_PREFIX}{id}"),
        }
    }
}

impl Serialize for CategoryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let Ok(id) = text.parse();

        Ok(id)
    }
}

/// A category that transactions can be filed under.
///
/// Built-in categories are fixed, identical for every user and not
/// persisted. Custom categories are owned by exactly one user and stored in
/// the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The category's identifier in the merged namespace.
    pub id: CategoryId,
    /// The display name, e.g. "Groceries".
    pub name: String,
    /// The icon reference shown next to the name.
    pub icon: String,
    /// Whether the category applies to income or expense transactions.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The owning user. Absent for built-in categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserID>,
}

/// The validated data needed to store a new custom category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The ID of the user that will own the category.
    pub user_id: UserID,
    /// The display name.
    pub name: String,
    /// The icon reference.
    pub icon: String,
    /// Whether the category applies to income or expense transactions.
    pub kind: TransactionType,
}

/// A partial update to a custom category. Only the display name and icon
/// can change, never the type or the owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    /// Replacement display name, if supplied.
    pub name: Option<String>,
    /// Replacement icon reference, if supplied.
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::CategoryId;

    #[test]
    fn parse_custom_id() {
        assert_eq!("custom-7".parse(), Ok(CategoryId::Custom(7)));
    }

    #[test]
    fn parse_builtin_id() {
        assert_eq!("food".parse(), Ok(CategoryId::Builtin("food".to_owned())));
    }

    #[test]
    fn malformed_custom_id_is_treated_as_builtin() {
        assert_eq!(
            "custom-abc".parse(),
            Ok(CategoryId::Builtin("custom-abc".to_owned()))
        );
    }

    #[test]
    fn id_round_trips_through_display() {
        for text in ["food", "custom-42"] {
            let id: CategoryId = text.parse().unwrap();

            assert_eq!(id.to_string(), text);
        }
    }

    #[test]
    fn id_serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&CategoryId::Custom(3)).unwrap(),
            "\"custom-3\"".to_owned()
        );
    }
}
