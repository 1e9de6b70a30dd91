//! Core data models for LedgerPulse
//!
//! This module contains the records that flow through the dashboard:
//! transactions, budgets, categories, notifications, users and reports.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod notification;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetPeriod, BudgetStatus, BudgetUpdate};
pub use category::{Category, CategoryCatalog};
pub use ids::{BudgetId, CategoryId, NotificationId, PaymentId, ReportId, TransactionId, UserId};
pub use money::Money;
pub use notification::{Notification, NotificationKind};
pub use transaction::{Transaction, TransactionKind, TransactionUpdate};
pub use user::{Report, ReportStatus, ReportType, Role, User};
