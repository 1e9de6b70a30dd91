//! LedgerPulse - Small-business financial dashboard engine
//!
//! This library provides the realtime analytics core of a small-business
//! financial dashboard: a simulated live data feed, a channel fan-out that
//! pushes its updates to subscribers, and a pure aggregation engine that
//! turns a transaction list into dashboard metrics.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `analytics`: Time ranges and the aggregation engine
//! - `realtime`: Clock, fan-out, mock generator, store and analytics hook
//! - `models`: Core data models (transactions, budgets, users, etc.)
//! - `services`: Ledger, budget, payment and calculator logic
//! - `reports`: Admin overview
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ledgerpulse::analytics::TimeRange;
//! use ledgerpulse::config::RealtimeSettings;
//! use ledgerpulse::realtime::{AnalyticsHook, MockGenerator, RealtimeStore, SystemClock};
//!
//! let store = RealtimeStore::new(
//!     Arc::new(SystemClock),
//!     MockGenerator::from_entropy(),
//!     RealtimeSettings::default(),
//! );
//! let hook = AnalyticsHook::attach(&store, TimeRange::Month);
//! store.connect();
//! store.poll();
//! println!("{}", hook.analytics().net_profit);
//! ```

pub mod analytics;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod realtime;
pub mod reports;
pub mod services;

pub use error::{LedgerError, LedgerResult};
