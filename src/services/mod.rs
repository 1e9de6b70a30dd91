//! Service layer for LedgerPulse
//!
//! Business logic on top of the data models: the per-user ledger, budget
//! tracking, the payment simulation and the calculator.

pub mod budget;
pub mod calculator;
pub mod ledger;
pub mod payment;

pub use budget::{apply_spending, starter_budgets, BudgetOverview, BudgetRow};
pub use calculator::{annual_total, simple_interest, Calculator, Key, Operator};
pub use ledger::{CreateTransactionInput, FinancialSummary, LedgerService, TransactionFilter};
pub use payment::{PaymentProcessor, PaymentReceipt};
