//! Transaction model
//!
//! Represents a single income or expenditure record. Transactions are
//! immutable once created except through an explicit `TransactionUpdate`
//! applied by their owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{TransactionId, UserId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming into the business
    Income,
    /// Money leaving the business
    Expenditure,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expenditure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expenditure => "expenditure",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expenditure => write!(f, "Expenditure"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expenditure" | "expense" | "out" => Ok(Self::Expenditure),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The user who recorded the transaction
    pub user_id: UserId,

    /// Income or expenditure
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Non-negative amount
    pub amount: Money,

    /// Free-text category label
    pub category: String,

    /// Short item name
    #[serde(default)]
    pub item: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// When the transaction happened
    pub date: DateTime<Utc>,

    /// Where it happened, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl Transaction {
    /// Create a new transaction with a fresh id
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: Money,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            kind,
            amount,
            category: category.into(),
            item: String::new(),
            description: String::new(),
            date,
            place: None,
        }
    }

    /// Set the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the item name (builder style)
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = item.into();
        self
    }

    /// Set the place (builder style)
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income)
    }

    pub fn is_expenditure(&self) -> bool {
        matches!(self.kind, TransactionKind::Expenditure)
    }

    /// Amount with sign applied: positive for income, negative for expenditure
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expenditure => -self.amount,
        }
    }

    /// Apply a partial update
    pub fn apply(&mut self, update: TransactionUpdate) {
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(item) = update.item {
            self.item = item;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(place) = update.place {
            self.place = place;
        }
    }

    /// Validate the transaction's required fields
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::MissingDescription);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount,
            self.category
        )
    }
}

/// A partial update to a transaction; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub item: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    /// `Some(None)` clears the place
    pub place: Option<Option<String>>,
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    MissingCategory,
    MissingDescription,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Transaction amount cannot be negative: {}", amount)
            }
            Self::MissingCategory => write!(f, "Transaction category is required"),
            Self::MissingDescription => write!(f, "Transaction description is required"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
