//! The fixed catalog of built-in categories and the rules for merging it
//! with a user's custom categories.

use crate::models::{Category, CategoryId, TransactionType};

/// The fixed set of built-in categories available to every user.
///
/// The catalog is constructed once at startup and injected into the
/// application state rather than read from global state. Built-ins are
/// never persisted and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    expense: Vec<Category>,
    income: Vec<Category>,
}

fn builtin(id: &str, name: &str, icon: &str, kind: TransactionType) -> Category {
    Category {
        id: CategoryId::Builtin(id.to_owned()),
        name: name.to_owned(),
        icon: icon.to_owned(),
        kind,
        user_id: None,
    }
}

impl Catalog {
    /// The standard built-in category set.
    pub fn standard() -> Self {
        use TransactionType::{Expense, Income};

        Self {
            expense: vec![
                builtin("food", "Food", "fast-food", Expense),
                builtin("transport", "Transport", "car", Expense),
                builtin("shopping", "Shopping", "cart", Expense),
                builtin("bills", "Bills", "document-text", Expense),
                builtin("entertainment", "Entertainment", "film", Expense),
                builtin("health", "Healthcare", "medical", Expense),
                builtin("education", "Education", "school", Expense),
                builtin("other", "Other", "ellipsis-horizontal", Expense),
            ],
            income: vec![
                builtin("salary", "Salary", "cash", Income),
                builtin("business", "Business", "briefcase", Income),
                builtin("investments", "Investments", "trending-up", Income),
                builtin("gifts", "Gifts", "gift", Income),
                builtin("other", "Other", "ellipsis-horizontal", Income),
            ],
        }
    }

    /// Build a catalog from explicit category lists, e.g. for tests.
    pub fn new(expense: Vec<Category>, income: Vec<Category>) -> Self {
        Self { expense, income }
    }

    /// The built-in categories of one type, in their configured order.
    pub fn builtins(&self, kind: TransactionType) -> &[Category] {
        match kind {
            TransactionType::Expense => &self.expense,
            TransactionType::Income => &self.income,
        }
    }

    /// The effective category list for one type: built-ins first in their
    /// configured order, then the matching custom categories in the order
    /// given.
    pub fn merged(&self, kind: TransactionType, custom: &[Category]) -> Vec<Category> {
        self.builtins(kind)
            .iter()
            .chain(custom.iter().filter(|category| category.kind == kind))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, builtin};
    use crate::models::{CategoryId, TransactionType, UserID};

    #[test]
    fn standard_catalog_matches_configured_set() {
        let catalog = Catalog::standard();

        assert_eq!(catalog.builtins(TransactionType::Expense).len(), 8);
        assert_eq!(catalog.builtins(TransactionType::Income).len(), 5);
        assert_eq!(
            catalog.builtins(TransactionType::Expense)[0].id,
            CategoryId::Builtin("food".to_owned())
        );
    }

    #[test]
    fn merged_lists_builtins_before_custom_categories() {
        let catalog = Catalog::standard();
        let mut custom = builtin("ignored", "Pets", "paw", TransactionType::Expense);
        custom.id = CategoryId::Custom(1);
        custom.user_id = Some(UserID::new(1));

        let merged = catalog.merged(TransactionType::Expense, &[custom.clone()]);

        assert_eq!(merged.len(), 9);
        assert_eq!(merged.last(), Some(&custom));
        assert_eq!(merged[..8], *catalog.builtins(TransactionType::Expense));
    }

    #[test]
    fn merged_excludes_custom_categories_of_other_type() {
        let catalog = Catalog::standard();
        let mut custom = builtin("ignored", "Royalties", "book", TransactionType::Income);
        custom.id = CategoryId::Custom(1);

        let merged = catalog.merged(TransactionType::Expense, &[custom]);

        assert_eq!(merged.len(), 8);
    }
}
