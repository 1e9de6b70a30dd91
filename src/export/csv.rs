//! CSV Export functionality
//!
//! Exports transactions and budgets in a spreadsheet-compatible layout.
//! Amounts are written as plain integers in the ledger currency.

use std::io::Write;

use crate::error::LedgerResult;
use crate::models::{Budget, Transaction};

/// Export transactions to CSV, in the order given
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: &mut W,
) -> LedgerResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record([
        "ID",
        "Date",
        "Type",
        "Category",
        "Item",
        "Description",
        "Place",
        "Amount",
    ])?;

    for txn in transactions {
        csv.write_record([
            txn.id.to_string(),
            txn.date.to_rfc3339(),
            txn.kind.to_string(),
            txn.category.clone(),
            txn.item.clone(),
            txn.description.clone(),
            txn.place.clone().unwrap_or_default(),
            txn.amount.amount().to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Export budgets with their spending status
pub fn export_budgets_csv<W: Write>(budgets: &[Budget], writer: &mut W) -> LedgerResult<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    csv.write_record([
        "ID", "Item", "Category", "Period", "Start", "End", "Budgeted", "Spent", "Remaining",
        "Status",
    ])?;

    for budget in budgets {
        csv.write_record([
            budget.id.to_string(),
            budget.item.clone(),
            budget.category.clone(),
            budget.period.to_string(),
            budget.start_date.to_string(),
            budget.end_date.to_string(),
            budget.budgeted_amount.amount().to_string(),
            budget.spent_amount.amount().to_string(),
            budget.remaining().amount().to_string(),
            budget.status().to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, Money, TransactionKind, UserId};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_export_transactions_quotes_commas() {
        let txn = Transaction::new(
            UserId::new(),
            TransactionKind::Expenditure,
            Money::new(45_000),
            "Supplies",
            Utc.with_ymd_and_hms(2025, 2, 3, 10, 0, 0).unwrap(),
        )
        .with_description("Paper, ink and toner")
        .with_place("Ikeja");

        let mut buffer = Vec::new();
        export_transactions_csv(std::slice::from_ref(&txn), &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("ID,Date,Type,Category,Item,Description,Place,Amount")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with(&txn.id.to_string()));
        assert!(row.contains("\"Paper, ink and toner\""));
        assert!(row.ends_with(",Ikeja,45000"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_empty_transactions_writes_header_only() {
        let mut buffer = Vec::new();
        export_transactions_csv(&[], &mut buffer).unwrap();
        assert_eq!(buffer.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn test_export_budgets() {
        let budget = Budget::new(
            UserId::new(),
            "Ads",
            "Marketing",
            Money::new(100_000),
            BudgetPeriod::Monthly,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
        )
        .with_spent(Money::new(85_000));

        let mut buffer = Vec::new();
        export_budgets_csv(&[budget], &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.contains(",Marketing,"));
        assert!(csv.contains(",2025-02-01,2025-02-28,100000,85000,15000,"));
    }
}
