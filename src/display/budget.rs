//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::truncate;
use crate::models::BudgetStatus;
use crate::services::BudgetOverview;

const BAR_WIDTH: usize = 10;

#[derive(Tabled)]
struct BudgetTableRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budgeted")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Text progress bar for a percentage capped at 100
fn progress_bar(progress: f64) -> String {
    let filled = ((progress / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn status_icon(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::Good => "✓",
        BudgetStatus::Warning => "!",
        BudgetStatus::Exceeded => "✗",
    }
}

/// Format a budget overview as a table plus status counts
pub fn format_budget_overview(overview: &BudgetOverview, symbol: &str) -> String {
    if overview.rows.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let rows = overview.rows.iter().map(|r| BudgetTableRow {
        item: truncate(&r.item, 24),
        category: r.category.clone(),
        budgeted: r.budgeted.format_with_symbol(symbol),
        spent: r.spent.format_with_symbol(symbol),
        remaining: r.remaining.format_with_symbol(symbol),
        used: format!("{} {:.1}%", progress_bar(r.progress()), r.percentage_used),
        status: format!("{} {}", status_icon(r.status), r.status),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());

    let mut output = table.to_string();
    output.push('\n');
    output.push_str(&format!(
        "Budgeted {} | Spent {} | Remaining {}\n",
        overview.total_budgeted.format_with_symbol(symbol),
        overview.total_spent.format_with_symbol(symbol),
        overview.total_remaining().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "{} good, {} warning, {} exceeded\n",
        overview.good, overview.warning, overview.exceeded
    ));
    output
}
