//! Dashboard display formatting
//!
//! Renders an `AnalyticsSnapshot` as the text dashboard: headline metrics,
//! alerts, top categories and the two trend series.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{format_change, truncate};
use crate::analytics::{AnalyticsSnapshot, TrendPoint};
use crate::realtime::StoreSummary;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Period")]
    label: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

fn trend_table(points: &[TrendPoint], symbol: &str) -> String {
    let rows = points.iter().map(|p| TrendRow {
        label: p.label.clone(),
        revenue: p.revenue.format_with_symbol(symbol),
        expenses: p.expenses.format_with_symbol(symbol),
        profit: p.profit.format_with_symbol(symbol),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format the full dashboard for one snapshot
pub fn format_snapshot(snapshot: &AnalyticsSnapshot, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Dashboard ({})\n",
        snapshot.time_range.as_str()
    ));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    if snapshot.is_empty() {
        output.push_str("No transactions in this period.\n");
    } else {
        output.push_str(&format!(
            "{:<22} {:>18}  {}\n",
            "Revenue:",
            snapshot.total_revenue.format_with_symbol(symbol),
            format_change(snapshot.revenue_growth)
        ));
        output.push_str(&format!(
            "{:<22} {:>18}  {}\n",
            "Expenses:",
            snapshot.total_expenses.format_with_symbol(symbol),
            format_change(snapshot.expense_growth)
        ));
        output.push_str(&format!(
            "{:<22} {:>18}\n",
            "Net profit:",
            snapshot.net_profit.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "{:<22} {:>17.1}%\n",
            "Profit margin:", snapshot.profit_margin
        ));
        output.push_str(&format!(
            "{:<22} {:>18}\n",
            "Transactions:", snapshot.transaction_count
        ));
        output.push_str(&format!(
            "{:<22} {:>18}\n",
            "Average value:",
            format!("{}{:.0}", symbol, snapshot.average_transaction_value)
        ));

        if !snapshot.alerts.is_empty() {
            output.push_str("\nAlerts\n");
            for alert in &snapshot.alerts {
                output.push_str(&format!("  {}\n", alert));
            }
        }

        if !snapshot.top_categories.is_empty() {
            output.push_str("\nTop categories\n");
            let rows = snapshot.top_categories.iter().map(|c| CategoryRow {
                name: truncate(&c.name, 24),
                amount: c.amount.format_with_symbol(symbol),
                share: format!("{:.1}%", c.percentage),
            });
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            output.push_str(&table.to_string());
            output.push('\n');
        }
    }

    if !snapshot.daily_trends.is_empty() {
        output.push_str("\nLast 7 days\n");
        output.push_str(&trend_table(&snapshot.daily_trends, symbol));
        output.push('\n');
    }

    if !snapshot.monthly_trends.is_empty() {
        output.push_str("\nLast 6 months\n");
        output.push_str(&trend_table(&snapshot.monthly_trends, symbol));
        output.push('\n');
    }

    output
}

/// One-paragraph platform summary from the realtime store
pub fn format_store_summary(summary: &StoreSummary, symbol: &str) -> String {
    format!(
        "Revenue {} ({}) | Expenses {} | Active users {} ({} sign-ups) | Pending reports {}\n",
        summary.total_revenue.format_with_symbol(symbol),
        format_change(summary.revenue_growth),
        summary.total_expenses.format_with_symbol(symbol),
        summary.active_users,
        format_change(summary.user_growth),
        summary.pending_reports
    )
}
