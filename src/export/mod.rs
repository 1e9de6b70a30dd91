//! Export module for LedgerPulse
//!
//! Provides data export in multiple formats:
//! - CSV: transactions and budgets (spreadsheet-compatible)
//! - JSON: machine-readable dashboard export
//! - YAML: human-readable dashboard export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_budgets_csv, export_transactions_csv};
pub use json::{
    export_dashboard_json, import_dashboard_json, DashboardExport, ExportMetadata,
    EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_dashboard_yaml, import_dashboard_yaml};
