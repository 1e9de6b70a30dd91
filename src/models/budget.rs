//! Budget model
//!
//! A budget tracks how much was planned for an item against how much has
//! actually been spent. The two amounts are independently mutable: spending
//! past the budgeted amount is reported as an `Exceeded` status rather than
//! rejected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{BudgetId, UserId};
use super::money::Money;
use super::transaction::TransactionKind;

/// Percentage of the budget at which a budget is flagged as a warning
pub const WARNING_THRESHOLD: f64 = 80.0;

/// Percentage of the budget at which a budget is flagged as exceeded
pub const EXCEEDED_THRESHOLD: f64 = 100.0;

/// How often a budget renews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            other => Err(format!("Unknown budget period: {}", other)),
        }
    }
}

/// Health of a budget relative to its planned amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Below the warning threshold
    Good,
    /// At or above 80% of the budget
    Warning,
    /// At or above 100% of the budget
    Exceeded,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Warning => write!(f, "warning"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// A budget line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub item: String,
    #[serde(default)]
    pub description: String,
    pub budgeted_amount: Money,
    pub spent_amount: Money,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Budget {
    /// Create a new expenditure budget with nothing spent yet
    pub fn new(
        user_id: UserId,
        item: impl Into<String>,
        category: impl Into<String>,
        budgeted_amount: Money,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: BudgetId::new(),
            user_id,
            item: item.into(),
            description: String::new(),
            budgeted_amount,
            spent_amount: Money::zero(),
            category: category.into(),
            kind: TransactionKind::Expenditure,
            period,
            start_date,
            end_date,
        }
    }

    /// Set the spent amount (builder style)
    pub fn with_spent(mut self, spent: Money) -> Self {
        self.spent_amount = spent;
        self
    }

    /// Spent as a percentage of budgeted; 0 when nothing is budgeted
    pub fn percentage_used(&self) -> f64 {
        self.spent_amount.percentage_of(self.budgeted_amount)
    }

    /// Budgeted minus spent. Negative once the budget is exceeded.
    pub fn remaining(&self) -> Money {
        self.budgeted_amount - self.spent_amount
    }

    pub fn status(&self) -> BudgetStatus {
        if self.budgeted_amount.is_zero() {
            return if self.spent_amount.is_positive() {
                BudgetStatus::Exceeded
            } else {
                BudgetStatus::Good
            };
        }

        let percentage = self.percentage_used();
        if percentage >= EXCEEDED_THRESHOLD {
            BudgetStatus::Exceeded
        } else if percentage >= WARNING_THRESHOLD {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Good
        }
    }

    /// Apply a partial update
    pub fn apply(&mut self, update: BudgetUpdate) {
        if let Some(item) = update.item {
            self.item = item;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(amount) = update.budgeted_amount {
            self.budgeted_amount = amount;
        }
        if let Some(amount) = update.spent_amount {
            self.spent_amount = amount;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(period) = update.period {
            self.period = period;
        }
        if let Some(start) = update.start_date {
            self.start_date = start;
        }
        if let Some(end) = update.end_date {
            self.end_date = end;
        }
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.item.trim().is_empty() {
            return Err(BudgetValidationError::MissingItem);
        }
        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::MissingCategory);
        }
        if self.budgeted_amount.is_negative() || self.spent_amount.is_negative() {
            return Err(BudgetValidationError::NegativeAmount);
        }
        if self.start_date > self.end_date {
            return Err(BudgetValidationError::InvertedDates {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} ({:.1}%, {})",
            self.item,
            self.spent_amount,
            self.budgeted_amount,
            self.percentage_used(),
            self.status()
        )
    }
}

/// A partial update to a budget
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub item: Option<String>,
    pub description: Option<String>,
    pub budgeted_amount: Option<Money>,
    pub spent_amount: Option<Money>,
    pub category: Option<String>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    MissingItem,
    MissingCategory,
    NegativeAmount,
    InvertedDates { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingItem => write!(f, "Budget item is required"),
            Self::MissingCategory => write!(f, "Budget category is required"),
            Self::NegativeAmount => write!(f, "Budget amounts cannot be negative"),
            Self::InvertedDates { start, end } => {
                write!(f, "Budget starts ({}) after it ends ({})", start, end)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
