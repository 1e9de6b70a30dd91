//! Aggregation engine for LedgerPulse
//!
//! Pure functions that bucket a transaction list into time windows and
//! category totals, and derive growth and margin ratios. Nothing in this
//! module reads a clock or touches shared state; the instant to aggregate at
//! is always an argument.

pub mod engine;
pub mod snapshot;
pub mod window;

pub use engine::{compute, growth_rate, in_window, percent_change, profit_margin, KindTotals};
pub use snapshot::{Alert, AlertKind, AnalyticsSnapshot, CategoryTotal, TrendPoint};
pub use window::{TimeRange, Window};
