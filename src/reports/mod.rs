//! Reports module for LedgerPulse
//!
//! Read-only summaries built from the store's data.

pub mod admin;

pub use admin::AdminOverview;
