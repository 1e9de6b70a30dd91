//! Aggregation engine
//!
//! Turns a transaction list and a time range into an `AnalyticsSnapshot`.
//! Every function here is pure: the instant to aggregate at is passed in, and
//! grouping uses ordered maps so equal inputs always give equal outputs.
//!
//! Scoping: totals, growth, top categories and recent transactions read the
//! range-filtered set. The daily and monthly trend series have fixed windows
//! of their own (7 days, 6 months) and read the full history, so they are
//! filled even when the selected range holds no transactions.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use super::snapshot::{Alert, AnalyticsSnapshot, CategoryTotal, TrendPoint};
use super::window::{month_start, previous_month_start, TimeRange, Window};
use crate::models::{Money, Transaction, TransactionKind};

/// Number of categories kept in `top_categories`
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// Number of transactions kept in `recent_transactions`
pub const RECENT_TRANSACTION_LIMIT: usize = 10;

/// Length of the daily trend series
pub const DAILY_TREND_DAYS: i64 = 7;

/// Length of the monthly trend series
pub const MONTHLY_TREND_MONTHS: usize = 6;

/// Label used for transactions with a blank category
pub const UNCATEGORIZED: &str = "Uncategorized";

const LOW_MARGIN_THRESHOLD: f64 = 10.0;
const REVENUE_DECLINE_THRESHOLD: f64 = -5.0;
const EXPENSE_SURGE_THRESHOLD: f64 = 20.0;
const HEALTHY_MARGIN_THRESHOLD: f64 = 20.0;

/// Revenue and expense sums for a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTotals {
    pub revenue: Money,
    pub expenses: Money,
}

impl KindTotals {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Self::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => totals.revenue += txn.amount,
                TransactionKind::Expenditure => totals.expenses += txn.amount,
            }
        }
        totals
    }

    pub fn net(&self) -> Money {
        self.revenue - self.expenses
    }
}

/// Compute the analytics snapshot for `range` as of `now`
pub fn compute(
    transactions: &[Transaction],
    range: TimeRange,
    now: DateTime<Utc>,
) -> AnalyticsSnapshot {
    if transactions.is_empty() {
        return AnalyticsSnapshot::empty(range);
    }

    let window = range.window(now);
    let filtered: Vec<&Transaction> = in_window(transactions, &window).collect();

    if filtered.is_empty() {
        return AnalyticsSnapshot {
            daily_trends: daily_trends(transactions, now),
            monthly_trends: monthly_trends(transactions, now),
            ..AnalyticsSnapshot::empty(range)
        };
    }

    let totals = KindTotals::of(filtered.iter().copied());
    let net_profit = totals.net();
    let margin = profit_margin(net_profit, totals.revenue);
    let transaction_count = filtered.len();
    let average_transaction_value =
        (totals.revenue.as_f64() + totals.expenses.as_f64()) / transaction_count as f64;

    let previous = KindTotals::of(in_window(transactions, &range.previous_window(now)));
    let revenue_growth = growth_rate(totals.revenue, previous.revenue);
    let expense_growth = growth_rate(totals.expenses, previous.expenses);

    let alerts = alerts(net_profit, margin, revenue_growth, expense_growth);

    AnalyticsSnapshot {
        time_range: range,
        total_revenue: totals.revenue,
        total_expenses: totals.expenses,
        net_profit,
        profit_margin: margin,
        transaction_count,
        average_transaction_value,
        revenue_growth,
        expense_growth,
        top_categories: top_categories(&filtered, TOP_CATEGORY_LIMIT),
        daily_trends: daily_trends(transactions, now),
        monthly_trends: monthly_trends(transactions, now),
        recent_transactions: recent(&filtered, RECENT_TRANSACTION_LIMIT),
        alerts,
    }
}

/// Transactions whose date falls inside `window`, in input order
pub fn in_window<'a>(
    transactions: &'a [Transaction],
    window: &'a Window,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |t| window.contains(&t.date))
}

/// Net profit as a percentage of revenue; 0 when there is no revenue
pub fn profit_margin(net_profit: Money, revenue: Money) -> f64 {
    net_profit.percentage_of(revenue)
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0
pub fn growth_rate(current: Money, previous: Money) -> f64 {
    percent_change(current.as_f64(), previous.as_f64())
}

/// `growth_rate` for plain counts
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Group by category label, largest first, keeping at most `limit`
///
/// Percentages are relative to the total over every category, so the kept
/// entries sum to at most 100.
pub fn top_categories(transactions: &[&Transaction], limit: usize) -> Vec<CategoryTotal> {
    let mut grouped: BTreeMap<&str, Money> = BTreeMap::new();
    for txn in transactions {
        let label = match txn.category.trim() {
            "" => UNCATEGORIZED,
            label => label,
        };
        *grouped.entry(label).or_default() += txn.amount;
    }

    let total: Money = grouped.values().sum();

    let mut categories: Vec<CategoryTotal> = grouped
        .into_iter()
        .map(|(name, amount)| CategoryTotal {
            name: name.to_string(),
            amount,
            percentage: amount.percentage_of(total),
        })
        .collect();

    // BTreeMap order already breaks ties by name; the sort is stable
    categories.sort_by(|a, b| b.amount.cmp(&a.amount));
    categories.truncate(limit);
    categories
}

/// Revenue/expenses per calendar day for the trailing 7 days, oldest first
pub fn daily_trends(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<TrendPoint> {
    let today = now.date_naive();
    (0..DAILY_TREND_DAYS)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let totals = KindTotals::of(in_window(transactions, &Window::day(day)));
            TrendPoint {
                label: day.format("%b %d").to_string(),
                start: day,
                revenue: totals.revenue,
                expenses: totals.expenses,
                profit: totals.net(),
            }
        })
        .collect()
}

/// Revenue/expenses per calendar month for the trailing 6 months, oldest first
pub fn monthly_trends(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<TrendPoint> {
    let mut starts = Vec::with_capacity(MONTHLY_TREND_MONTHS);
    let mut cursor = month_start(now.date_naive());
    for _ in 0..MONTHLY_TREND_MONTHS {
        starts.push(cursor);
        cursor = previous_month_start(cursor);
    }

    starts
        .into_iter()
        .rev()
        .map(|start| {
            let totals = KindTotals::of(in_window(transactions, &Window::month(start)));
            TrendPoint {
                label: start.format("%b %Y").to_string(),
                start,
                revenue: totals.revenue,
                expenses: totals.expenses,
                profit: totals.net(),
            }
        })
        .collect()
}

/// Most recent first, keeping at most `limit`
pub fn recent(transactions: &[&Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.into_iter().take(limit).cloned().collect()
}

/// Threshold alerts, in a fixed order
pub fn alerts(
    net_profit: Money,
    profit_margin: f64,
    revenue_growth: f64,
    expense_growth: f64,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if profit_margin < LOW_MARGIN_THRESHOLD {
        alerts.push(Alert::warning("Low profit margin detected", profit_margin));
    }

    if revenue_growth < REVENUE_DECLINE_THRESHOLD {
        alerts.push(Alert::warning("Revenue declining", revenue_growth));
    }

    if expense_growth > EXPENSE_SURGE_THRESHOLD {
        alerts.push(Alert::warning("Expenses growing rapidly", expense_growth));
    }

    if net_profit.is_positive() && profit_margin > HEALTHY_MARGIN_THRESHOLD {
        alerts.push(Alert::success("Healthy profit margins", profit_margin));
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AlertKind;
    use crate::models::UserId;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn txn(kind: TransactionKind, amount: i64, category: &str, days_ago: i64) -> Transaction {
        Transaction::new(
            UserId::new(),
            kind,
            Money::new(amount),
            category,
            now() - Duration::days(days_ago),
        )
        .with_description("test")
    }

    fn income(amount: i64, category: &str, days_ago: i64) -> Transaction {
        txn(TransactionKind::Income, amount, category, days_ago)
    }

    fn expense(amount: i64, category: &str, days_ago: i64) -> Transaction {
        txn(TransactionKind::Expenditure, amount, category, days_ago)
    }

    #[test]
    fn test_month_scenario() {
        let transactions = vec![income(500_000, "Sales", 2), expense(150_000, "Rent", 3)];
        let snap = compute(&transactions, TimeRange::Month, now());

        assert_eq!(snap.total_revenue, Money::new(500_000));
        assert_eq!(snap.total_expenses, Money::new(150_000));
        assert_eq!(snap.net_profit, Money::new(350_000));
        assert_eq!(snap.profit_margin, 70.0);
        assert_eq!(snap.transaction_count, 2);
        assert_eq!(snap.average_transaction_value, 325_000.0);
        assert_eq!(snap.alerts, vec![Alert::success("Healthy profit margins", 70.0)]);
    }

    #[test]
    fn test_empty_input_is_zeroed() {
        for range in TimeRange::ALL {
            let snap = compute(&[], range, now());
            assert_eq!(snap, AnalyticsSnapshot::empty(range));
            assert!(snap.top_categories.is_empty());
            assert!(snap.alerts.is_empty());
            assert_eq!(snap.profit_margin, 0.0);
        }
    }

    #[test]
    fn test_empty_range_keeps_trends() {
        let just_after_midnight = Utc.with_ymd_and_hms(2025, 6, 15, 0, 30, 0).unwrap();
        let transactions = vec![Transaction::new(
            UserId::new(),
            TransactionKind::Income,
            Money::new(500),
            "Sales",
            just_after_midnight - Duration::days(1),
        )
        .with_description("yesterday")];

        let snap = compute(&transactions, TimeRange::Today, just_after_midnight);
        assert!(snap.is_empty());
        assert_eq!(snap.total_revenue, Money::zero());
        assert_eq!(snap.net_profit, Money::zero());
        assert_eq!(snap.average_transaction_value, 0.0);
        assert!(snap.top_categories.is_empty());
        assert!(snap.recent_transactions.is_empty());
        assert!(snap.alerts.is_empty());

        assert_eq!(snap.daily_trends.len(), 7);
        assert_eq!(snap.daily_trends[5].revenue, Money::new(500));
        assert_eq!(snap.daily_trends[6].revenue, Money::zero());
        assert_eq!(snap.monthly_trends.len(), 6);
        assert_eq!(snap.monthly_trends[5].revenue, Money::new(500));
    }

    #[test]
    fn test_out_of_range_history_still_trends() {
        let transactions = vec![income(1000, "Sales", 40)];
        let snap = compute(&transactions, TimeRange::Week, now());
        assert!(snap.is_empty());
        assert_eq!(snap.daily_trends.len(), 7);
        assert!(snap.daily_trends.iter().all(|p| p.revenue.is_zero()));
        let monthly: Money = snap.monthly_trends.iter().map(|p| p.revenue).sum();
        assert_eq!(monthly, Money::new(1000));
    }

    #[test]
    fn test_large_amounts_saturate() {
        let half = i64::MAX / 2 + 1;
        let transactions = vec![income(half, "Sales", 0), income(half, "Sales", 1)];
        assert!(transactions.iter().all(|t| t.validate().is_ok()));

        let snap = compute(&transactions, TimeRange::Week, now());
        assert_eq!(snap.total_revenue, Money::new(i64::MAX));
        assert_eq!(snap.net_profit, Money::new(i64::MAX));
        assert!(snap.average_transaction_value.is_finite());
        assert_eq!(snap.top_categories[0].amount, Money::new(i64::MAX));

        let spent = vec![expense(half, "Rent", 0), expense(half, "Rent", 1)];
        let snap = compute(&spent, TimeRange::Week, now());
        assert_eq!(snap.net_profit, Money::new(-i64::MAX));
    }

    #[test]
    fn test_net_profit_identity_across_ranges() {
        let transactions = vec![
            income(750_000, "Sales", 0),
            expense(1_500_000, "Operations", 1),
            income(50_000, "Services", 20),
            expense(250_000, "Marketing", 80),
            income(1_000_000, "Sales", 200),
        ];
        for range in TimeRange::ALL {
            let snap = compute(&transactions, range, now());
            assert_eq!(snap.total_revenue - snap.total_expenses, snap.net_profit);
            assert!(snap.profit_margin.is_finite());
        }
    }

    #[test]
    fn test_margin_is_zero_without_revenue() {
        let transactions = vec![expense(100_000, "Rent", 1)];
        let snap = compute(&transactions, TimeRange::Week, now());
        assert_eq!(snap.profit_margin, 0.0);
        assert_eq!(snap.net_profit, Money::new(-100_000));
        assert_eq!(
            snap.alerts,
            vec![Alert::warning("Low profit margin detected", 0.0)]
        );
    }

    #[test]
    fn test_growth_against_previous_window() {
        // current week: 200k revenue, 130k expenses; previous week: 100k / 100k
        let transactions = vec![
            income(200_000, "Sales", 1),
            expense(130_000, "Operations", 2),
            income(100_000, "Sales", 9),
            expense(100_000, "Operations", 10),
            income(999_999, "Sales", 30),
        ];
        let snap = compute(&transactions, TimeRange::Week, now());
        assert_eq!(snap.revenue_growth, 100.0);
        assert!((snap.expense_growth - 30.0).abs() < 1e-9);
        assert!(snap
            .alerts
            .iter()
            .any(|a| a.message == "Expenses growing rapidly"));
    }

    #[test]
    fn test_growth_zero_previous() {
        assert_eq!(growth_rate(Money::new(100), Money::zero()), 0.0);
        assert_eq!(growth_rate(Money::new(50), Money::new(100)), -50.0);
    }

    #[test]
    fn test_declining_revenue_alert() {
        let transactions = vec![
            income(50_000, "Sales", 1),
            income(100_000, "Sales", 10),
        ];
        let snap = compute(&transactions, TimeRange::Week, now());
        assert_eq!(snap.revenue_growth, -50.0);
        let messages: Vec<_> = snap.alerts.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["Revenue declining", "Healthy profit margins"]);
        assert_eq!(snap.alerts[0].kind, AlertKind::Warning);
    }

    #[test]
    fn test_top_categories() {
        let transactions = vec![
            income(400, "Sales", 1),
            expense(300, "Rent", 1),
            expense(100, "Admin", 1),
            expense(100, "", 1),
            income(50, "A", 1),
            income(50, "B", 1),
        ];
        let snap = compute(&transactions, TimeRange::Month, now());
        let names: Vec<_> = snap.top_categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sales", "Rent", "Admin", "Uncategorized", "A"]);
        assert_eq!(snap.top_categories[0].percentage, 40.0);

        let sum: f64 = snap.top_categories.iter().map(|c| c.percentage).sum();
        assert!(sum <= 100.0 + 1e-9);
        assert!((sum - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_category_percentages_sum_to_hundred() {
        let transactions = vec![
            income(333, "Sales", 1),
            expense(333, "Rent", 1),
            expense(334, "Admin", 1),
        ];
        let snap = compute(&transactions, TimeRange::Month, now());
        let sum: f64 = snap.top_categories.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_trends_cover_seven_days() {
        let transactions = vec![
            income(100, "Sales", 0),
            expense(40, "Rent", 0),
            income(70, "Sales", 6),
            income(1_000, "Sales", 7),
        ];
        let snap = compute(&transactions, TimeRange::Month, now());
        assert_eq!(snap.daily_trends.len(), 7);
        assert_eq!(snap.daily_trends[0].label, "Jun 09");
        assert_eq!(snap.daily_trends[0].revenue, Money::new(70));
        let last = &snap.daily_trends[6];
        assert_eq!(last.label, "Jun 15");
        assert_eq!(last.profit, Money::new(60));
    }

    #[test]
    fn test_monthly_trends_read_full_history() {
        let transactions = vec![
            income(100, "Sales", 1),
            income(500, "Sales", 100),
        ];
        let snap = compute(&transactions, TimeRange::Week, now());
        let labels: Vec<_> = snap.monthly_trends.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Jan 2025", "Feb 2025", "Mar 2025", "Apr 2025", "May 2025", "Jun 2025"]
        );
        // 100 days before Jun 15 is Mar 7, outside the week but inside the series
        assert_eq!(snap.monthly_trends[2].revenue, Money::new(500));
        assert_eq!(snap.monthly_trends[5].revenue, Money::new(100));
    }

    #[test]
    fn test_recent_is_sorted_and_capped() {
        let transactions: Vec<_> = (0..15).map(|d| income(100 + d, "Sales", d)).collect();
        let mut shuffled = transactions.clone();
        shuffled.reverse();
        let snap = compute(&shuffled, TimeRange::Month, now());
        assert_eq!(snap.recent_transactions.len(), 10);
        assert_eq!(snap.recent_transactions[0].id, transactions[0].id);
        assert!(snap
            .recent_transactions
            .windows(2)
            .all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let transactions = vec![
            income(750_000, "Sales", 0),
            expense(250_000, "Marketing", 3),
            expense(250_000, "Admin", 3),
            income(100_000, "Services", 12),
        ];
        for range in TimeRange::ALL {
            let a = compute(&transactions, range, now());
            let b = compute(&transactions, range, now());
            assert_eq!(a, b);
            assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }

    #[test]
    fn test_snapshot_field_names() {
        let snap = compute(&[income(10, "Sales", 0)], TimeRange::Today, now());
        let json = serde_json::to_value(&snap).unwrap();
        for field in [
            "totalRevenue",
            "totalExpenses",
            "netProfit",
            "profitMargin",
            "transactionCount",
            "averageTransactionValue",
            "revenueGrowth",
            "expenseGrowth",
            "topCategories",
            "dailyTrends",
            "monthlyTrends",
            "recentTransactions",
            "alerts",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
