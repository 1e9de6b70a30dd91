//! Ledger service
//!
//! A per-user working set of transactions and budgets with create, update
//! and delete operations and the headline financial summary. Admins see
//! every user's records; everyone else sees only their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Budget, BudgetId, BudgetUpdate, Money, Transaction, TransactionId, TransactionKind,
    TransactionUpdate, User,
};

/// Headline figures for the ledger's working set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: Money,
    pub total_expenditure: Money,
    pub profit: Money,
    /// Total spent as a percentage of total budgeted; 0 when nothing is budgeted
    pub budget_utilization: f64,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub item: Option<String>,
    pub description: String,
    pub date: DateTime<Utc>,
    pub place: Option<String>,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    /// Case-insensitive category match
    pub category: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn between(mut self, since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self
                .category
                .as_deref()
                .map_or(true, |c| txn.category.eq_ignore_ascii_case(c))
            && self.since.map_or(true, |since| txn.date >= since)
            && self.until.map_or(true, |until| txn.date <= until)
    }
}

/// Service for one user's transactions and budgets
#[derive(Debug, Clone)]
pub struct LedgerService {
    viewer: User,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl LedgerService {
    /// Load the records `viewer` may see
    pub fn for_user(
        viewer: User,
        transactions: impl IntoIterator<Item = Transaction>,
        budgets: impl IntoIterator<Item = Budget>,
    ) -> Self {
        let transactions = transactions
            .into_iter()
            .filter(|t| viewer.is_admin() || t.user_id == viewer.id)
            .collect();
        let budgets = budgets
            .into_iter()
            .filter(|b| viewer.is_admin() || b.user_id == viewer.id)
            .collect();

        Self {
            viewer,
            transactions,
            budgets,
        }
    }

    pub fn viewer(&self) -> &User {
        &self.viewer
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Transactions matching `filter`, newest first
    pub fn list_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut matching: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = filter.limit {
            matching.truncate(limit);
        }
        matching
    }

    pub fn get_transaction(&self, id: TransactionId) -> LedgerResult<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))
    }

    /// Create a transaction owned by the viewer
    pub fn add_transaction(&mut self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        let mut txn = Transaction::new(
            self.viewer.id,
            input.kind,
            input.amount,
            input.category.trim(),
            input.date,
        )
        .with_description(input.description.trim());

        if let Some(item) = input.item {
            txn.item = item.trim().to_string();
        }
        txn.place = input
            .place
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        tracing::debug!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction added");
        self.transactions.push(txn.clone());
        Ok(txn)
    }

    pub fn update_transaction(
        &mut self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> LedgerResult<Transaction> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        let mut updated = slot.clone();
        updated.apply(update);
        updated
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        *slot = updated.clone();
        Ok(updated)
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;
        Ok(self.transactions.remove(index))
    }

    /// Add a budget owned by the viewer
    pub fn add_budget(&mut self, mut budget: Budget) -> LedgerResult<Budget> {
        budget.user_id = self.viewer.id;
        budget
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.budgets.push(budget.clone());
        Ok(budget)
    }

    pub fn update_budget(&mut self, id: BudgetId, update: BudgetUpdate) -> LedgerResult<Budget> {
        let slot = self
            .budgets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))?;

        let mut updated = slot.clone();
        updated.apply(update);
        updated
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        *slot = updated.clone();
        Ok(updated)
    }

    pub fn delete_budget(&mut self, id: BudgetId) -> LedgerResult<Budget> {
        let index = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))?;
        Ok(self.budgets.remove(index))
    }

    pub fn financial_summary(&self) -> FinancialSummary {
        let mut total_income = Money::zero();
        let mut total_expenditure = Money::zero();
        for txn in &self.transactions {
            match txn.kind {
                TransactionKind::Income => total_income += txn.amount,
                TransactionKind::Expenditure => total_expenditure += txn.amount,
            }
        }

        let total_budgeted: Money = self.budgets.iter().map(|b| b.budgeted_amount).sum();
        let total_spent: Money = self.budgets.iter().map(|b| b.spent_amount).sum();

        FinancialSummary {
            total_income,
            total_expenditure,
            profit: total_income - total_expenditure,
            budget_utilization: total_spent.percentage_of(total_budgeted),
        }
    }
}
