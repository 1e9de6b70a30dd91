//! Realtime layer for LedgerPulse
//!
//! A simulated live connection (`RealtimeStore`) driven by an injectable
//! `Clock`, the channel fan-out it publishes through, the mock data source
//! behind it, and the analytics hook that keeps a snapshot in sync.

pub mod clock;
pub mod fanout;
pub mod generator;
pub mod hook;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fanout::{Fanout, Subscription};
pub use generator::{InitialData, MockGenerator};
pub use hook::AnalyticsHook;
pub use store::{Channel, ConnectionStatus, RealtimeStore, StoreData, StoreEvent, StoreSummary};
