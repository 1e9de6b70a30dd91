//! Configuration module for LedgerPulse
//!
//! Base-directory resolution and the persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{PaymentSettings, RealtimeSettings, Settings};
