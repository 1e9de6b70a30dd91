//! Category model
//!
//! Categories are a static lookup: the catalogue is built once and never
//! mutated at runtime. Transactions and budgets reference categories by
//! label, so a transaction may carry a label that is not in the catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::transaction::TransactionKind;

/// Default catalogue entries: (name, kind, color)
const DEFAULT_CATEGORIES: &[(&str, TransactionKind, &str)] = &[
    ("Sales", TransactionKind::Income, "#10B981"),
    ("Services", TransactionKind::Income, "#3B82F6"),
    ("Investment", TransactionKind::Income, "#8B5CF6"),
    ("Other Income", TransactionKind::Income, "#06B6D4"),
    ("Marketing", TransactionKind::Expenditure, "#F59E0B"),
    ("Operations", TransactionKind::Expenditure, "#EF4444"),
    ("Admin", TransactionKind::Expenditure, "#6B7280"),
    ("Transport", TransactionKind::Expenditure, "#F97316"),
    ("Utilities", TransactionKind::Expenditure, "#84CC16"),
    ("Salaries", TransactionKind::Expenditure, "#EC4899"),
    ("Rent", TransactionKind::Expenditure, "#14B8A6"),
];

/// A transaction category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Display color as a hex string
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: TransactionKind, color: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            color: color.into(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Read-only lookup of the known categories
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Build the catalogue from a fixed list
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The built-in catalogue
    pub fn defaults() -> Self {
        Self::new(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(name, kind, color)| Category::new(*name, *kind, *color))
                .collect(),
        )
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// Categories usable for the given transaction kind
    pub fn for_kind(&self, kind: TransactionKind) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.kind == kind)
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::defaults()
    }
}
