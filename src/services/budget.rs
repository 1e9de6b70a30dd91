//! Budget service
//!
//! Status rows and counts for a set of budgets, and spending derived from
//! the transactions that fall inside each budget's dates.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::window::{month_start, next_month_start};
use crate::models::{
    Budget, BudgetId, BudgetPeriod, BudgetStatus, Money, Transaction, TransactionKind, UserId,
};

/// Monthly budgets offered to a new business, as (item, category, amount)
const STARTER_BUDGETS: [(&str, &str, i64); 5] = [
    ("Advertising", "Marketing", 1_500_000),
    ("Running costs", "Operations", 2_000_000),
    ("Office and admin", "Admin", 750_000),
    ("Deliveries", "Transport", 500_000),
    ("Power and water", "Utilities", 400_000),
];

/// One budget's standing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    pub budget_id: BudgetId,
    pub item: String,
    pub category: String,
    pub budgeted: Money,
    pub spent: Money,
    pub remaining: Money,
    pub percentage_used: f64,
    pub status: BudgetStatus,
}

impl BudgetRow {
    /// `percentage_used` capped at 100, for progress bars
    pub fn progress(&self) -> f64 {
        self.percentage_used.min(100.0)
    }
}

impl From<&Budget> for BudgetRow {
    fn from(budget: &Budget) -> Self {
        Self {
            budget_id: budget.id,
            item: budget.item.clone(),
            category: budget.category.clone(),
            budgeted: budget.budgeted_amount,
            spent: budget.spent_amount,
            remaining: budget.remaining(),
            percentage_used: budget.percentage_used(),
            status: budget.status(),
        }
    }
}

/// Budget overview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub rows: Vec<BudgetRow>,
    pub total_budgeted: Money,
    pub total_spent: Money,
    pub good: usize,
    pub warning: usize,
    pub exceeded: usize,
}

impl BudgetOverview {
    pub fn of(budgets: &[Budget]) -> Self {
        let rows: Vec<BudgetRow> = budgets.iter().map(BudgetRow::from).collect();
        let count = |status: BudgetStatus| rows.iter().filter(|r| r.status == status).count();

        Self {
            total_budgeted: rows.iter().map(|r| r.budgeted).sum(),
            total_spent: rows.iter().map(|r| r.spent).sum(),
            good: count(BudgetStatus::Good),
            warning: count(BudgetStatus::Warning),
            exceeded: count(BudgetStatus::Exceeded),
            rows,
        }
    }

    pub fn total_remaining(&self) -> Money {
        self.total_budgeted - self.total_spent
    }

    /// Rows that need attention, worst first
    pub fn attention(&self) -> Vec<&BudgetRow> {
        let mut flagged: Vec<&BudgetRow> = self
            .rows
            .iter()
            .filter(|r| r.status != BudgetStatus::Good)
            .collect();
        flagged.sort_by(|a, b| b.percentage_used.total_cmp(&a.percentage_used));
        flagged
    }
}

/// Recompute each budget's spent amount from `transactions`
///
/// A budget counts the expenditures whose category matches its own
/// (case-insensitively) and whose date falls within its start and end dates.
pub fn apply_spending(budgets: &mut [Budget], transactions: &[Transaction]) {
    for budget in budgets.iter_mut() {
        budget.spent_amount = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expenditure)
            .filter(|t| t.category.eq_ignore_ascii_case(&budget.category))
            .filter(|t| {
                let day = t.date.date_naive();
                budget.start_date <= day && day <= budget.end_date
            })
            .map(|t| t.amount)
            .sum();
    }
}

/// Starter monthly budgets for the calendar month containing `today`
pub fn starter_budgets(owner: UserId, today: NaiveDate) -> Vec<Budget> {
    let start = month_start(today);
    let end = next_month_start(start).pred_opt().unwrap_or(start);

    STARTER_BUDGETS
        .iter()
        .map(|(item, category, amount)| {
            Budget::new(
                owner,
                *item,
                *category,
                Money::new(*amount),
                BudgetPeriod::Monthly,
                start,
                end,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn budget(category: &str, budgeted: i64, spent: i64) -> Budget {
        Budget::new(
            UserId::new(),
            format!("{} budget", category),
            category,
            Money::new(budgeted),
            BudgetPeriod::Monthly,
            day(1),
            day(31),
        )
        .with_spent(Money::new(spent))
    }

    fn expense(category: &str, amount: i64, d: u32) -> Transaction {
        Transaction::new(
            UserId::new(),
            TransactionKind::Expenditure,
            Money::new(amount),
            category,
            Utc.with_ymd_and_hms(2025, 3, d, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_overview_counts_statuses() {
        let overview = BudgetOverview::of(&[
            budget("Marketing", 100_000, 120_000),
            budget("Admin", 100_000, 85_000),
            budget("Transport", 100_000, 10_000),
            budget("Utilities", 0, 0),
        ]);

        assert_eq!(overview.exceeded, 1);
        assert_eq!(overview.warning, 1);
        assert_eq!(overview.good, 2);
        assert_eq!(overview.total_budgeted, Money::new(300_000));
        assert_eq!(overview.total_spent, Money::new(215_000));
        assert_eq!(overview.total_remaining(), Money::new(85_000));

        let exceeded = &overview.rows[0];
        assert_eq!(exceeded.remaining, Money::new(-20_000));
        assert_eq!(exceeded.percentage_used, 120.0);
        assert_eq!(exceeded.progress(), 100.0);

        let attention = overview.attention();
        assert_eq!(attention.len(), 2);
        assert_eq!(attention[0].category, "Marketing");
    }

    #[test]
    fn test_apply_spending_respects_category_and_dates() {
        let mut budgets = vec![budget("Marketing", 1_000_000, 0)];
        let mut outside = expense("Marketing", 999, 1);
        outside.date = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let mut income = expense("Marketing", 777, 5);
        income.kind = TransactionKind::Income;

        apply_spending(
            &mut budgets,
            &[
                expense("marketing", 250_000, 3),
                expense("Marketing", 100_000, 31),
                expense("Admin", 50_000, 3),
                outside,
                income,
            ],
        );

        assert_eq!(budgets[0].spent_amount, Money::new(350_000));
    }

    #[test]
    fn test_starter_budgets_cover_the_month() {
        let owner = UserId::new();
        let budgets = starter_budgets(owner, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());

        assert_eq!(budgets.len(), STARTER_BUDGETS.len());
        for b in &budgets {
            assert_eq!(b.user_id, owner);
            assert_eq!(b.start_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
            assert_eq!(b.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
            assert!(b.validate().is_ok());
            assert_eq!(b.status(), BudgetStatus::Good);
        }
    }
}
