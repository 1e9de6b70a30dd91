//! Display formatting for terminal output
//!
//! Renders snapshots, transactions, budgets and notifications as text and
//! `tabled` tables. Every formatter takes the currency symbol to show.

pub mod budget;
pub mod category;
pub mod notification;
pub mod snapshot;
pub mod transaction;

pub use budget::format_budget_overview;
pub use category::format_category_list;
pub use notification::format_notifications;
pub use snapshot::{format_snapshot, format_store_summary};
pub use transaction::{format_transaction_details, format_transaction_table};

/// Shorten `s` to at most `max_chars` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Signed percentage with one decimal, e.g. "+12.5%"
pub(crate) fn format_change(value: f64) -> String {
    format!("{:+.1}%", value)
}
