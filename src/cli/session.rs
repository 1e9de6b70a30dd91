//! Simulated session for one-shot commands
//!
//! Runs the realtime store on a virtual clock pinned to the current instant,
//! so a command sees the connected state without waiting for the handshake.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::Settings;
use crate::realtime::{Clock, ManualClock, MockGenerator, RealtimeStore};

/// A connected store with its initial data loaded
pub struct Session {
    clock: ManualClock,
    store: RealtimeStore,
}

impl Session {
    /// Connect and complete the handshake; `seed` makes the data reproducible
    pub fn start(settings: &Settings, seed: Option<u64>) -> Self {
        let clock = ManualClock::new(Utc::now());
        let generator = seed.map_or_else(MockGenerator::from_entropy, MockGenerator::with_seed);
        let store = RealtimeStore::new(
            Arc::new(clock.clone()),
            generator,
            settings.realtime.clone(),
        );

        store.connect();
        clock.advance(settings.realtime.handshake_delay());
        store.poll();

        Self { clock, store }
    }

    /// Play `ticks` transaction intervals of live activity
    pub fn fast_forward(&self, ticks: u32) {
        let interval = self.store.settings().transaction_interval();
        for _ in 0..ticks {
            self.clock.advance(interval);
            self.store.poll();
        }
    }

    pub fn store(&self) -> &RealtimeStore {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.store.dispose();
    }
}
