//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod admin;
pub mod budget;
pub mod dashboard;
pub mod export;
pub mod session;
pub mod tools;

pub use admin::handle_admin;
pub use budget::{handle_budget_command, BudgetCommands};
pub use dashboard::{
    handle_dashboard, handle_notifications, handle_transactions, handle_watch, OutputFormat,
    SessionArgs,
};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use session::Session;
pub use tools::{handle_calc, handle_interest, handle_pay};
