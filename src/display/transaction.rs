//! Transaction display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::truncate;
use crate::models::{Transaction, TransactionKind};

const DESCRIPTION_WIDTH: usize = 32;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl TransactionRow {
    fn new(txn: &Transaction, symbol: &str, date_format: &str) -> Self {
        let sign = match txn.kind {
            TransactionKind::Income => "+",
            TransactionKind::Expenditure => "-",
        };
        Self {
            date: txn.date.format(date_format).to_string(),
            kind: txn.kind.to_string(),
            category: txn.category.clone(),
            description: truncate(&txn.description, DESCRIPTION_WIDTH),
            amount: format!("{}{}", sign, txn.amount.format_with_symbol(symbol)),
        }
    }
}

/// Format transactions as a table, in the order given
pub fn format_transaction_table(
    transactions: &[Transaction],
    symbol: &str,
    date_format: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions
        .iter()
        .map(|t| TransactionRow::new(t, symbol, date_format));
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d %H:%M")));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.item.is_empty() {
        output.push_str(&format!("Item:        {}\n", txn.item));
    }
    output.push_str(&format!("Description: {}\n", txn.description));
    if let Some(place) = &txn.place {
        output.push_str(&format!("Place:       {}\n", place));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, UserId};
    use chrono::{TimeZone, Utc};

    fn txn(kind: TransactionKind, amount: i64) -> Transaction {
        Transaction::new(
            UserId::new(),
            kind,
            Money::new(amount),
            "Sales",
            Utc.with_ymd_and_hms(2025, 4, 2, 14, 5, 0).unwrap(),
        )
        .with_description("Market stall takings")
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_transaction_table(&[], "₦", "%Y-%m-%d"),
            "No transactions found.\n"
        );
    }

    #[test]
    fn test_table_rows() {
        let output = format_transaction_table(
            &[
                txn(TransactionKind::Income, 1_500_000),
                txn(TransactionKind::Expenditure, 50_000),
            ],
            "₦",
            "%Y-%m-%d",
        );

        assert!(output.contains("Description"));
        assert!(output.contains("2025-04-02"));
        assert!(output.contains("+₦1,500,000"));
        assert!(output.contains("-₦50,000"));
        assert!(output.contains("Market stall takings"));
    }

    #[test]
    fn test_details_show_optional_fields_only_when_set() {
        let plain = format_transaction_details(&txn(TransactionKind::Income, 100), "$");
        assert!(plain.contains("Amount:      $100"));
        assert!(!plain.contains("Place:"));

        let placed = format_transaction_details(
            &txn(TransactionKind::Income, 100).with_place("Balogun Market"),
            "$",
        );
        assert!(placed.contains("Place:       Balogun Market"));
    }
}
